//! Typed binding for the terraform CLI.
//!
//! Every operation builds an argument vector, runs terraform once and returns
//! either a [`TerraformResult`] or a [`TerraformError`] carrying the command
//! line, captured stderr and duration.
//!
//! ```no_run
//! use terrabind::{config::Settings, SelectOptions, Terraform, WorkspaceListOptions};
//!
//! let mut tf = Terraform::new(Settings::default());
//! let names = tf.workspace().list(&WorkspaceListOptions::default())?.result;
//! if !names.iter().any(|n| n == "staging") {
//!     tf.workspace().select("staging", &SelectOptions { or_create: true, ..Default::default() })?;
//! }
//! # Ok::<(), terrabind::TerraformError>(())
//! ```
pub mod args;
pub mod commands;
pub mod config;
pub mod error;
pub mod outcome;
pub mod paths;
pub mod runner;
pub mod terraform;
pub mod version;

mod testutil;

pub use commands::*;
pub use error::{ErrorKind, TerraformError};
pub use outcome::TerraformResult;
pub use runner::{CommandRunner, ProcessOutput, SystemRunner};
pub use terraform::{Invocation, Terraform};
pub use version::VersionInfo;
