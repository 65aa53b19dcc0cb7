use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "terrabind", version, about = "Run terraform and get structured results")]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Working directory for terraform (overrides config)
    #[arg(long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Terraform binary to run (overrides config and TERRABIND_BINARY)
    #[arg(long, global = true)]
    pub binary: Option<String>,

    /// Disable colored terraform output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Default)]
pub struct RunArgs {
    /// Input variable as KEY=VALUE (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
    /// Variable file (repeatable)
    #[arg(long = "var-file", value_name = "PATH")]
    pub var_files: Vec<PathBuf>,
    /// Resource address to target (repeatable)
    #[arg(long = "target", value_name = "ADDRESS")]
    pub targets: Vec<String>,
    /// Limit concurrent operations
    #[arg(long)]
    pub parallelism: Option<u32>,
    /// Do not hold a state lock
    #[arg(long)]
    pub no_lock: bool,
    /// How long to wait for a state lock (e.g. 30s)
    #[arg(long)]
    pub lock_timeout: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show terraform version and platform
    Version,
    /// Initialize the working directory
    Init {
        /// Backend config KEY=VALUE or file (repeatable)
        #[arg(long)]
        backend_config: Vec<String>,
        /// Upgrade modules and providers
        #[arg(long)]
        upgrade: bool,
        /// Ignore existing backend configuration
        #[arg(long)]
        reconfigure: bool,
        /// Migrate state to a changed backend
        #[arg(long)]
        migrate_state: bool,
    },
    /// Validate the configuration
    Validate,
    /// Format configuration files
    Fmt {
        /// Fail if any file needs formatting
        #[arg(long)]
        check: bool,
        /// Also process subdirectories
        #[arg(long)]
        recursive: bool,
        /// Directory or file to format
        target: Option<String>,
    },
    /// Create an execution plan
    Plan {
        /// Save the plan to this file
        #[arg(long)]
        out: Option<PathBuf>,
        /// Plan to destroy all resources
        #[arg(long)]
        destroy: bool,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Apply changes
    Apply {
        /// Skip interactive approval
        #[arg(long)]
        auto_approve: bool,
        /// Saved plan file to apply
        plan_file: Option<PathBuf>,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Destroy managed infrastructure
    Destroy {
        /// Skip interactive approval
        #[arg(long)]
        auto_approve: bool,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Show state or a saved plan as JSON
    Show {
        /// Saved plan or state file
        path: Option<String>,
    },
    /// Read output values
    Output {
        /// Output name (all outputs if omitted)
        name: Option<String>,
    },
    /// Advanced state management
    State {
        #[command(subcommand)]
        command: StateCommand,
    },
    /// Workspace management
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommand,
    },
}

#[derive(Subcommand)]
pub enum StateCommand {
    /// List resources in the state
    List {
        /// Filter by resource address (repeatable)
        addresses: Vec<String>,
        /// Filter by resource id
        #[arg(long)]
        id: Option<String>,
        /// Read this state file instead
        #[arg(long)]
        state: Option<String>,
    },
    /// Show one resource in the state
    Show {
        address: String,
        /// Read this state file instead
        #[arg(long)]
        state: Option<String>,
    },
    /// Move an item in the state
    Mv {
        source: String,
        destination: String,
        /// Only print what would be moved
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        no_lock: bool,
        #[arg(long)]
        lock_timeout: Option<String>,
    },
    /// Remove an item from the state
    Rm {
        address: String,
        /// Only print what would be removed
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        no_lock: bool,
        #[arg(long)]
        lock_timeout: Option<String>,
    },
    /// Replace provider in the state
    ReplaceProvider {
        from: String,
        to: String,
        /// Skip interactive approval
        #[arg(long)]
        auto_approve: bool,
        #[arg(long)]
        no_lock: bool,
        #[arg(long)]
        lock_timeout: Option<String>,
    },
    /// Print the current state
    Pull,
    /// Upload a local state file ("-" reads state from stdin)
    Push {
        path: Option<String>,
        /// Write even if lineage or serial checks fail
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum WorkspaceCommand {
    /// List workspaces
    List,
    /// Show the current workspace name
    Show,
    /// Select a workspace
    Select {
        name: String,
        /// Create the workspace if it does not exist
        #[arg(long)]
        or_create: bool,
    },
    /// Create a workspace
    New {
        name: String,
        /// Copy this state into the new workspace
        #[arg(long)]
        state: Option<String>,
    },
    /// Delete a workspace
    Delete {
        name: String,
        /// Delete even if it still tracks resources
        #[arg(long)]
        force: bool,
    },
}
