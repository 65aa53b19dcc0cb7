use std::path::PathBuf;

use crate::args::{self, ArgList};
use crate::error::TerraformError;
use crate::outcome::TerraformResult;
use crate::terraform::Terraform;

const CURRENT_MARKER: char = '*';

/// `terraform workspace ...` subcommands. Successful selection or creation
/// updates the handle's current workspace.
pub struct Workspace<'a> {
    tf: &'a mut Terraform,
}

#[derive(Debug, Default, Clone)]
pub struct WorkspaceListOptions {
    /// Demote the success/failure log lines to debug.
    pub quiet: bool,
    pub color: Option<bool>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct WorkspaceShowOptions {
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct SelectOptions {
    pub or_create: bool,
    pub quiet: bool,
    pub color: Option<bool>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct NewOptions {
    pub lock: Option<bool>,
    pub lock_timeout: Option<String>,
    pub state: Option<String>,
    pub color: Option<bool>,
    pub chdir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct DeleteOptions {
    pub force: Option<bool>,
    pub lock: Option<bool>,
    pub lock_timeout: Option<String>,
    pub color: Option<bool>,
    pub chdir: Option<PathBuf>,
}

/// Parsed `terraform workspace list` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceListing {
    pub names: Vec<String>,
    pub current: Option<String>,
}

pub fn parse_workspace_list(stdout: &str) -> WorkspaceListing {
    let mut names = Vec::new();
    let mut current = None;

    for line in stdout.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match trimmed.strip_prefix(CURRENT_MARKER) {
            Some(rest) => {
                let name = rest.trim().to_string();
                if current.is_none() {
                    current = Some(name.clone());
                }
                names.push(name);
            }
            None => names.push(trimmed.to_string()),
        }
    }

    WorkspaceListing { names, current }
}

impl<'a> Workspace<'a> {
    pub(crate) fn with_handle(tf: &'a mut Terraform) -> Self {
        Self { tf }
    }

    /// All workspace names, markers stripped. The marked entry becomes the
    /// handle's current workspace.
    pub fn list(
        &mut self,
        opts: &WorkspaceListOptions,
    ) -> Result<TerraformResult<Vec<String>>, TerraformError> {
        let mut args = ArgList::new(&["workspace", "list"]);
        args.flag(self.tf.color_flag(opts.color));

        let inv = self
            .tf
            .run(&args, "workspace list", opts.chdir.as_deref(), opts.quiet)?;

        let listing = parse_workspace_list(&inv.stdout);
        match &listing.current {
            Some(current) => self.tf.set_workspace(current),
            None => tracing::warn!("workspace list output had no current workspace marker"),
        }
        Ok(TerraformResult::ok(listing.names))
    }

    /// Name of the active workspace as terraform reports it.
    pub fn show(
        &mut self,
        opts: &WorkspaceShowOptions,
    ) -> Result<TerraformResult<String>, TerraformError> {
        let args = ArgList::new(&["workspace", "show"]);
        let inv = self
            .tf
            .run(&args, "workspace show", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(inv.stdout.trim().to_string()))
    }

    /// Switches to `workspace`. With `or_create`, terraform releases without
    /// `-or-create` get a list-then-new fallback instead.
    pub fn select(
        &mut self,
        workspace: &str,
        opts: &SelectOptions,
    ) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["workspace", "select"]);
        args.flag(self.tf.color_flag(opts.color));

        if opts.or_create {
            let version = self.tf.detected_version()?.clone();
            if version.supports_or_create() {
                args.flag(args::switch("or_create", Some(true)));
            } else {
                let existing = self
                    .list(&WorkspaceListOptions {
                        quiet: true,
                        color: opts.color,
                        chdir: opts.chdir.clone(),
                    })?
                    .into_inner();
                if !existing.iter().any(|name| name == workspace) {
                    if !opts.quiet {
                        tracing::warn!(
                            version = %version.version_str,
                            "-or-create needs terraform 1.4.0 or newer; creating {} with workspace new",
                            workspace
                        );
                    }
                    return self.new(
                        workspace,
                        &NewOptions {
                            color: opts.color,
                            chdir: opts.chdir.clone(),
                            ..Default::default()
                        },
                    );
                }
            }
        }
        args.positional(workspace);

        self.tf
            .run(&args, "workspace select", opts.chdir.as_deref(), opts.quiet)?;
        self.tf.set_workspace(workspace);
        Ok(TerraformResult::ok(workspace.to_string()))
    }

    #[allow(clippy::new_ret_no_self)]
    pub fn new(
        &mut self,
        workspace: &str,
        opts: &NewOptions,
    ) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["workspace", "new"]);
        args.flags(self.tf.lock_flags(opts.lock, opts.lock_timeout.as_deref()))
            .flag(self.tf.color_flag(opts.color))
            .flag(args::text("state", opts.state.as_deref()))
            .positional(workspace);

        self.tf
            .run(&args, "workspace new", opts.chdir.as_deref(), false)?;
        self.tf.set_workspace(workspace);
        Ok(TerraformResult::ok(workspace.to_string()))
    }

    pub fn delete(
        &mut self,
        workspace: &str,
        opts: &DeleteOptions,
    ) -> Result<TerraformResult<String>, TerraformError> {
        let mut args = ArgList::new(&["workspace", "delete"]);
        args.flag(args::switch("force", opts.force))
            .flags(self.tf.lock_flags(opts.lock, opts.lock_timeout.as_deref()))
            .flag(self.tf.color_flag(opts.color))
            .positional(workspace);

        self.tf
            .run(&args, "workspace delete", opts.chdir.as_deref(), false)?;
        Ok(TerraformResult::ok(workspace.to_string()))
    }
}
