use std::io::Write;
use std::path::{Path, PathBuf};

use crate::args::{self, ArgList};
use crate::error::TerraformError;
use crate::outcome::TerraformResult;
use crate::terraform::Terraform;

const TEMP_STATE_PREFIX: &str = "terraform-temp-state-";
const TEMP_STATE_SUFFIX: &str = ".tfstate";

/// `terraform state ...` subcommands.
pub struct State<'a> {
    tf: &'a Terraform,
}

#[derive(Debug, Default, Clone)]
pub struct StateListOptions {
    pub addresses: Vec<String>,
    pub state: Option<String>,
    pub id: Option<String>,
    pub color: Option<bool>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct StateShowOptions {
    pub state: Option<String>,
    pub color: Option<bool>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct StateMvOptions {
    pub dry_run: Option<bool>,
    pub lock: Option<bool>,
    pub lock_timeout: Option<String>,
    pub state: Option<String>,
    pub state_out: Option<String>,
    pub backup: Option<String>,
    pub backup_out: Option<String>,
    pub ignore_remote_version: Option<bool>,
    pub color: Option<bool>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct StateRmOptions {
    pub dry_run: Option<bool>,
    pub lock: Option<bool>,
    pub lock_timeout: Option<String>,
    pub state: Option<String>,
    pub state_out: Option<String>,
    pub backup: Option<String>,
    pub ignore_remote_version: Option<bool>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct ReplaceProviderOptions {
    pub auto_approve: Option<bool>,
    pub lock: Option<bool>,
    pub lock_timeout: Option<String>,
    pub state: Option<String>,
    pub state_out: Option<String>,
    pub backup: Option<String>,
    pub ignore_remote_version: Option<bool>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct StatePullOptions {
    pub chdir: Option<PathBuf>,
}

/// What `state push` uploads.
#[derive(Debug, Clone)]
pub enum PushSource {
    /// Existing state file, relative to the working directory or absolute.
    File(PathBuf),
    /// State JSON held in memory. Written to a temp file for the call.
    Content(String),
}

#[derive(Debug, Default, Clone)]
pub struct StatePushOptions {
    pub force: Option<bool>,
    pub ignore_remote_version: Option<bool>,
    pub chdir: Option<PathBuf>,
}

impl<'a> State<'a> {
    pub(crate) fn with_handle(tf: &'a Terraform) -> Self {
        Self { tf }
    }

    pub fn list(&self, opts: &StateListOptions) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["state", "list"]);
        args.flag(self.tf.color_flag(opts.color))
            .flag(args::text("state", opts.state.as_deref()))
            .flag(args::text("id", opts.id.as_deref()));
        for address in &opts.addresses {
            args.positional(address.as_str());
        }

        let inv = self
            .tf
            .run(&args, "state list", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout))
    }

    pub fn show(
        &self,
        address: &str,
        opts: &StateShowOptions,
    ) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["state", "show"]);
        args.flag(self.tf.color_flag(opts.color))
            .flag(args::text("state", opts.state.as_deref()))
            .positional(address);

        let inv = self
            .tf
            .run(&args, "state show", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout))
    }

    pub fn mv(
        &self,
        src: &str,
        dest: &str,
        opts: &StateMvOptions,
    ) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["state", "mv"]);
        args.flag(self.tf.color_flag(opts.color))
            .flag(args::switch("dry_run", opts.dry_run))
            .flags(self.tf.lock_flags(opts.lock, opts.lock_timeout.as_deref()))
            .flag(args::text("state", opts.state.as_deref()))
            .flag(args::text("state_out", opts.state_out.as_deref()))
            .flag(args::text("backup", opts.backup.as_deref()))
            .flag(args::text("backup_out", opts.backup_out.as_deref()))
            .flag(args::switch(
                "ignore_remote_version",
                opts.ignore_remote_version,
            ))
            .positional(src)
            .positional(dest);

        let inv = self.tf.run(&args, "state mv", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout))
    }

    pub fn rm(
        &self,
        address: &str,
        opts: &StateRmOptions,
    ) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["state", "rm"]);
        args.flag(args::switch("dry_run", opts.dry_run))
            .flags(self.tf.lock_flags(opts.lock, opts.lock_timeout.as_deref()))
            .flag(args::text("state", opts.state.as_deref()))
            .flag(args::text("state_out", opts.state_out.as_deref()))
            .flag(args::text("backup", opts.backup.as_deref()))
            .flag(args::switch(
                "ignore_remote_version",
                opts.ignore_remote_version,
            ))
            .positional(address);

        let inv = self.tf.run(&args, "state rm", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout))
    }

    pub fn replace_provider(
        &self,
        src_provider: &str,
        dest_provider: &str,
        opts: &ReplaceProviderOptions,
    ) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["state", "replace-provider"]);
        args.flags(self.tf.lock_flags(opts.lock, opts.lock_timeout.as_deref()))
            .flag(args::switch("auto_approve", opts.auto_approve))
            .flag(args::text("state", opts.state.as_deref()))
            .flag(args::text("state_out", opts.state_out.as_deref()))
            .flag(args::text("backup", opts.backup.as_deref()))
            .flag(args::switch(
                "ignore_remote_version",
                opts.ignore_remote_version,
            ))
            .positional(src_provider)
            .positional(dest_provider);

        let inv = self.tf.run(
            &args,
            "state replace-provider",
            opts.chdir.as_deref(),
            false,
        )?;
        Ok(TerraformResult::ok(inv.stdout))
    }

    /// Raw state JSON as terraform prints it.
    pub fn pull(&self, opts: &StatePullOptions) -> Result<TerraformResult<String>, TerraformError> {
        let args = ArgList::new(&["state", "pull"]);
        let inv = self
            .tf
            .run(&args, "state pull", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout))
    }

    /// Uploads a state file. Inline content goes through a temp file in the
    /// working directory that is removed whether or not the push succeeds.
    pub fn push(
        &self,
        source: Option<PushSource>,
        opts: &StatePushOptions,
    ) -> Result<TerraformResult<String>, TerraformError> {
        let Some(source) = source else {
            tracing::error!("No file path or content provided, please provide one");
            return Err(TerraformError::missing_input(
                "state push",
                "No file path or content provided, please provide one",
            ));
        };

        let dir = self.tf.dir(opts.chdir.as_deref());
        let mut args = ArgList::new(&["state", "push"]);
        args.flag(args::switch("force", opts.force))
            .flag(args::switch(
                "ignore_remote_version",
                opts.ignore_remote_version,
            ));

        // Held until after the invocation; dropping it deletes the file.
        let _temp_guard = match source {
            PushSource::File(path) => {
                args.positional(path.to_string_lossy());
                None
            }
            PushSource::Content(content) => {
                let temp = write_temp_state(dir, &content)?;
                let name = temp
                    .path()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                args.positional(name);
                Some(temp)
            }
        };

        let inv = self
            .tf
            .run(&args, "state push", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout))
    }
}

fn write_temp_state(dir: &Path, content: &str) -> Result<tempfile::NamedTempFile, TerraformError> {
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_STATE_PREFIX)
        .suffix(TEMP_STATE_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| TerraformError::io("state push", "failed to create temp state file", e))?;
    temp.write_all(content.as_bytes())
        .and_then(|()| temp.flush())
        .map_err(|e| TerraformError::io("state push", "failed to write temp state file", e))?;
    tracing::info!(path = %temp.path().display(), "Created temp state file");
    Ok(temp)
}
