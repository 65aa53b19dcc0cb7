use std::time::Duration;

use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required argument was missing. Nothing was spawned.
    MissingInput,
    /// The process ran and reported failure.
    Failed,
    /// The binary could not be started.
    Spawn,
    /// Local file handling around the invocation failed.
    Io,
    /// The process succeeded but its output could not be decoded.
    Parse,
}

/// Failure of a single terraform operation.
///
/// Carries enough context (command line, stderr, duration) to diagnose the
/// failure without re-running it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TerraformError {
    kind: ErrorKind,
    message: String,
    subcommand: String,
    command_line: Option<String>,
    stderr: String,
    duration_seconds: f64,
    #[source]
    source: Option<BoxedSource>,
}

impl TerraformError {
    pub fn missing_input(subcommand: &str, detail: &str) -> Self {
        Self {
            kind: ErrorKind::MissingInput,
            message: format!("Failed to run terraform {}", subcommand),
            subcommand: subcommand.to_string(),
            command_line: None,
            stderr: detail.to_string(),
            duration_seconds: 0.0,
            source: None,
        }
    }

    pub fn failed(
        subcommand: &str,
        command_line: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            kind: ErrorKind::Failed,
            message: format!("Failed to run terraform {}", subcommand),
            subcommand: subcommand.to_string(),
            command_line: Some(command_line),
            stderr,
            duration_seconds: round_seconds(duration),
            source: None,
        }
    }

    pub fn spawn(subcommand: &str, command_line: String, source: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Spawn,
            message: format!("failed to start terraform {}: {}", subcommand, source),
            subcommand: subcommand.to_string(),
            command_line: Some(command_line),
            stderr: String::new(),
            duration_seconds: 0.0,
            source: Some(Box::new(source)),
        }
    }

    pub fn io(subcommand: &str, context: &str, source: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            message: format!("terraform {}: {}: {}", subcommand, context, source),
            subcommand: subcommand.to_string(),
            command_line: None,
            stderr: String::new(),
            duration_seconds: 0.0,
            source: Some(Box::new(source)),
        }
    }

    pub fn parse(
        subcommand: &str,
        command_line: String,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: ErrorKind::Parse,
            message: format!(
                "failed to parse output of terraform {}: {}",
                subcommand, source
            ),
            subcommand: subcommand.to_string(),
            command_line: Some(command_line),
            stderr: String::new(),
            duration_seconds: 0.0,
            source: Some(Box::new(source)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    pub fn command_line(&self) -> Option<&str> {
        self.command_line.as_deref()
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }
}

/// Seconds with two decimals, the precision used in log lines.
pub fn round_seconds(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 100.0).round() / 100.0
}
