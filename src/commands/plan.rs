use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::args::{self, ArgList};
use crate::error::TerraformError;
use crate::outcome::TerraformResult;
use crate::terraform::Terraform;

/// Inputs shared by plan, apply and destroy.
#[derive(Debug, Default, Clone)]
pub struct RunInputs {
    pub vars: BTreeMap<String, String>,
    /// Falls back to the handle's `var_file` when empty.
    pub var_files: Vec<PathBuf>,
    pub targets: Vec<String>,
    pub lock: Option<bool>,
    pub lock_timeout: Option<String>,
    pub input: Option<bool>,
    pub parallelism: Option<u32>,
    pub color: Option<bool>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct PlanOptions {
    pub destroy: Option<bool>,
    pub refresh_only: Option<bool>,
    pub refresh: Option<bool>,
    /// Where terraform should save the plan.
    pub out: Option<PathBuf>,
    pub inputs: RunInputs,
}

#[derive(Debug, Default, Clone)]
pub struct ApplyOptions {
    pub auto_approve: Option<bool>,
    /// Saved plan to apply. Variables and targets are baked into a saved plan,
    /// so terraform rejects them alongside one.
    pub plan_file: Option<PathBuf>,
    pub refresh: Option<bool>,
    pub inputs: RunInputs,
}

#[derive(Debug, Default, Clone)]
pub struct DestroyOptions {
    pub auto_approve: Option<bool>,
    pub inputs: RunInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOutput {
    pub stdout: String,
    pub plan_file: Option<PathBuf>,
}

impl Terraform {
    fn run_input_flags(&self, inputs: &RunInputs) -> Vec<String> {
        let mut out = Vec::new();
        out.extend(args::vars(&inputs.vars));
        out.extend(self.var_file_flags(&inputs.var_files));
        out.extend(args::repeated("target", &inputs.targets));
        out.extend(self.lock_flags(inputs.lock, inputs.lock_timeout.as_deref()));
        out.extend(self.input_flag(inputs.input));
        out.extend(self.parallelism_flag(inputs.parallelism));
        out.extend(self.color_flag(inputs.color));
        out
    }

    pub fn plan(&self, opts: &PlanOptions) -> Result<TerraformResult<PlanOutput>, TerraformError> {
        let out = opts.out.as_ref().map(|p| p.to_string_lossy().into_owned());
        let mut args = ArgList::new(&["plan"]);
        args.flag(args::switch("destroy", opts.destroy))
            .flag(args::switch("refresh_only", opts.refresh_only))
            .flag(args::switch("refresh", opts.refresh))
            .flag(args::text("out", out.as_deref()))
            .flags(self.run_input_flags(&opts.inputs));

        let inv = self.run(&args, "plan", opts.inputs.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(PlanOutput {
            stdout: inv.stdout,
            plan_file: opts.out.clone(),
        }))
    }

    pub fn apply(&self, opts: &ApplyOptions) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["apply"]);
        args.flag(self.auto_approve_flag(opts.auto_approve))
            .flag(args::switch("refresh", opts.refresh));

        match &opts.plan_file {
            Some(plan) => {
                args.flags(self.lock_flags(opts.inputs.lock, opts.inputs.lock_timeout.as_deref()))
                    .flag(self.input_flag(opts.inputs.input))
                    .flag(self.parallelism_flag(opts.inputs.parallelism))
                    .flag(self.color_flag(opts.inputs.color))
                    .positional(plan.to_string_lossy());
            }
            None => {
                args.flags(self.run_input_flags(&opts.inputs));
            }
        }

        let inv = self.run(&args, "apply", opts.inputs.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout))
    }

    pub fn destroy(&self, opts: &DestroyOptions) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["destroy"]);
        args.flag(self.auto_approve_flag(opts.auto_approve))
            .flags(self.run_input_flags(&opts.inputs));

        let inv = self.run(&args, "destroy", opts.inputs.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout))
    }
}
