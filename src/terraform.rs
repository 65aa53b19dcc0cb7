use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::args::{self, ArgList};
use crate::commands::{State, Workspace};
use crate::config::Settings;
use crate::error::{round_seconds, TerraformError};
use crate::paths::working_dir;
use crate::runner::{CommandRunner, SystemRunner};
use crate::version::VersionInfo;

/// One finished terraform process, successful or not.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub success: bool,
    pub command_line: String,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

/// Shared handle for a terraform working directory.
///
/// Holds the defaults every command falls back to, the detected version and
/// the name of the current workspace. Facades borrow it; workspace changes and
/// version detection need `&mut`.
pub struct Terraform {
    settings: Settings,
    workspace: String,
    version: Option<VersionInfo>,
    runner: Box<dyn CommandRunner>,
}

impl std::fmt::Debug for Terraform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terraform")
            .field("settings", &self.settings)
            .field("workspace", &self.workspace)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Terraform {
    pub fn new(settings: Settings) -> Self {
        Self::with_runner(settings, SystemRunner)
    }

    pub fn with_runner(settings: Settings, runner: impl CommandRunner + 'static) -> Self {
        let workspace = settings.workspace.clone();
        Self {
            settings,
            workspace,
            version: None,
            runner: Box::new(runner),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn current_workspace(&self) -> &str {
        &self.workspace
    }

    /// Version info from an earlier detection, if any.
    pub fn cached_version(&self) -> Option<&VersionInfo> {
        self.version.as_ref()
    }

    pub fn state(&self) -> State<'_> {
        State::with_handle(self)
    }

    pub fn workspace(&mut self) -> Workspace<'_> {
        Workspace::with_handle(self)
    }

    pub(crate) fn set_workspace(&mut self, name: &str) {
        self.workspace = name.to_string();
        tracing::info!(workspace = %name, "set current environment");
    }

    pub(crate) fn set_version(&mut self, info: VersionInfo) -> &VersionInfo {
        self.version.insert(info)
    }

    // --- Fallbacks to handle defaults ---

    pub(crate) fn color_flag(&self, color: Option<bool>) -> Option<String> {
        args::color(color.unwrap_or(self.settings.color))
    }

    pub(crate) fn lock_flags(&self, lock: Option<bool>, lock_timeout: Option<&str>) -> Vec<String> {
        args::lock(
            lock.unwrap_or(self.settings.lock),
            lock_timeout.unwrap_or(self.settings.lock_timeout.as_str()),
        )
    }

    /// Always explicit, so terraform never blocks on a prompt unless asked.
    pub(crate) fn input_flag(&self, input: Option<bool>) -> Option<String> {
        args::switch("input", Some(input.unwrap_or(self.settings.input)))
    }

    pub(crate) fn parallelism_flag(&self, parallelism: Option<u32>) -> Option<String> {
        args::number(
            "parallelism",
            Some(parallelism.unwrap_or(self.settings.parallelism)),
        )
    }

    pub(crate) fn auto_approve_flag(&self, auto_approve: Option<bool>) -> Option<String> {
        auto_approve
            .unwrap_or(self.settings.auto_approve)
            .then(|| "-auto-approve".to_string())
    }

    /// Caller's var files, or the handle's default when the caller gave none.
    pub(crate) fn var_file_flags(&self, var_files: &[PathBuf]) -> Vec<String> {
        let files: Vec<String> = if var_files.is_empty() {
            self.settings
                .var_file
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect()
        } else {
            var_files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect()
        };
        args::repeated("var_file", &files)
    }

    pub(crate) fn dir<'a>(&'a self, chdir: Option<&'a Path>) -> &'a Path {
        working_dir(chdir, &self.settings.chdir)
    }

    // --- Invocation ---

    /// Runs terraform once and reports the outcome without judging it.
    pub(crate) fn invoke(
        &self,
        args: &ArgList,
        subcommand: &str,
        chdir: Option<&Path>,
    ) -> Result<Invocation, TerraformError> {
        let command_line = args::render_command_line(&self.settings.binary, args.as_slice());
        let cwd = self.dir(chdir);
        tracing::debug!(command = %command_line, cwd = %cwd.display(), "Terraform {}", subcommand);

        let start = Instant::now();
        let output = self
            .runner
            .run(&self.settings.binary, args.as_slice(), cwd)
            .map_err(|e| {
                tracing::error!(command = %command_line, error = %e, "Terraform {} could not start", subcommand);
                TerraformError::spawn(subcommand, command_line.clone(), e)
            })?;

        Ok(Invocation {
            success: output.success,
            command_line,
            stdout: output.stdout,
            stderr: output.stderr,
            duration: start.elapsed(),
        })
    }

    /// Turns a failed invocation into an error, logging either way.
    pub(crate) fn check(
        invocation: Invocation,
        subcommand: &str,
        quiet: bool,
    ) -> Result<Invocation, TerraformError> {
        let duration_s = round_seconds(invocation.duration);
        if !invocation.success {
            if quiet {
                tracing::debug!(duration_s, "Terraform {} failed in {}s", subcommand, duration_s);
            } else {
                tracing::error!(
                    duration_s,
                    command = %invocation.command_line,
                    "Terraform {} failed in {}s",
                    subcommand,
                    duration_s
                );
            }
            return Err(TerraformError::failed(
                subcommand,
                invocation.command_line,
                invocation.stderr,
                invocation.duration,
            ));
        }

        if quiet {
            tracing::debug!(duration_s, "Terraform {} completed in {}s", subcommand, duration_s);
        } else {
            tracing::info!(duration_s, "Terraform {} completed in {}s", subcommand, duration_s);
        }
        Ok(invocation)
    }

    pub(crate) fn run(
        &self,
        args: &ArgList,
        subcommand: &str,
        chdir: Option<&Path>,
        quiet: bool,
    ) -> Result<Invocation, TerraformError> {
        let invocation = self.invoke(args, subcommand, chdir)?;
        Self::check(invocation, subcommand, quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testutil::fake_terraform;

    #[test]
    fn new_handle_starts_in_configured_workspace() {
        let mut settings = Settings::default();
        settings.workspace = "staging".to_string();
        let tf = Terraform::new(settings);
        assert_eq!(tf.current_workspace(), "staging");
        assert!(tf.cached_version().is_none());
    }

    #[test]
    fn run_success_returns_stdout() {
        let tmp = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.ok("hello\n");

        let inv = tf
            .run(&ArgList::new(&["validate"]), "validate", None, false)
            .unwrap();
        assert!(inv.success);
        assert_eq!(inv.stdout, "hello\n");
        assert_eq!(inv.command_line, "terraform validate");
        assert_eq!(fake.calls()[0].cwd, tmp.path());
    }

    #[test]
    fn run_failure_is_error_with_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.fail("Error: Invalid reference\n");

        let err = tf
            .run(&ArgList::new(&["validate"]), "validate", None, false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Failed);
        assert_eq!(err.stderr(), "Error: Invalid reference\n");
        assert_eq!(err.command_line(), Some("terraform validate"));
    }

    #[test]
    fn spawn_failure_is_spawn_error() {
        let tmp = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.spawn_error();

        let err = tf
            .run(&ArgList::new(&["version"]), "version", None, false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Spawn);
    }

    #[test]
    fn chdir_override_is_used() {
        let tmp = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let (tf, fake) = fake_terraform(tmp.path());
        fake.ok("");

        tf.run(&ArgList::new(&["init"]), "init", Some(other.path()), false)
            .unwrap();
        assert_eq!(fake.calls()[0].cwd, other.path());
    }

    #[test]
    fn lock_flags_fall_back_to_handle() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut tf, _fake) = fake_terraform(tmp.path());
        assert!(tf.lock_flags(None, None).is_empty());

        tf.settings_mut().lock = false;
        tf.settings_mut().lock_timeout = "10s".to_string();
        assert_eq!(
            tf.lock_flags(None, None),
            vec!["-lock=false".to_string(), "-lock-timeout=10s".to_string()]
        );
        // Explicit caller values win over the handle, including `true`.
        assert_eq!(
            tf.lock_flags(Some(true), Some("0s")),
            Vec::<String>::new()
        );
    }

    #[test]
    fn color_flag_falls_back_to_handle() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut tf, _fake) = fake_terraform(tmp.path());
        assert_eq!(tf.color_flag(None), None);
        assert_eq!(tf.color_flag(Some(false)), Some("-no-color".to_string()));

        tf.settings_mut().color = false;
        assert_eq!(tf.color_flag(None), Some("-no-color".to_string()));
        assert_eq!(tf.color_flag(Some(true)), None);
    }
}
