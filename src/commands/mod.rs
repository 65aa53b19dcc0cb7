//! One file per group of terraform subcommands. Top-level commands are
//! methods on [`crate::Terraform`]; `state` and `workspace` are facades that
//! borrow the handle.
mod init;
mod inspect;
mod plan;
mod state;
mod version;
mod workspace;

pub use init::*;
pub use inspect::*;
pub use plan::*;
pub use state::*;
pub use workspace::*;
