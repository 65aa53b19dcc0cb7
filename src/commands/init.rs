use std::path::PathBuf;

use crate::args::{self, ArgList};
use crate::error::TerraformError;
use crate::outcome::TerraformResult;
use crate::terraform::Terraform;

#[derive(Debug, Default, Clone)]
pub struct InitOptions {
    pub backend: Option<bool>,
    /// `key=value` pairs or paths to backend config files.
    pub backend_config: Vec<String>,
    pub upgrade: Option<bool>,
    pub reconfigure: Option<bool>,
    pub migrate_state: Option<bool>,
    pub lock: Option<bool>,
    pub lock_timeout: Option<String>,
    pub input: Option<bool>,
    pub color: Option<bool>,
    pub chdir: Option<PathBuf>,
}

impl Terraform {
    pub fn init(&self, opts: &InitOptions) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["init"]);
        args.flag(args::switch("backend", opts.backend))
            .flags(args::repeated("backend_config", &opts.backend_config))
            .flag(args::switch("upgrade", opts.upgrade))
            .flag(args::switch("reconfigure", opts.reconfigure))
            .flag(args::switch("migrate_state", opts.migrate_state))
            .flags(self.lock_flags(opts.lock, opts.lock_timeout.as_deref()))
            .flag(self.input_flag(opts.input))
            .flag(self.color_flag(opts.color));

        let inv = self.run(&args, "init", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout))
    }
}
