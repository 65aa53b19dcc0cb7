mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command, RunArgs, StateCommand, WorkspaceCommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use terrabind::config::{self, Settings};
use terrabind::{
    ApplyOptions, DeleteOptions, DestroyOptions, FmtOptions, InitOptions, NewOptions, OutputOptions,
    PlanOptions, PlanOutput, PushSource, ReplaceProviderOptions, RunInputs, SelectOptions,
    ShowOptions, StateListOptions, StateMvOptions, StatePullOptions, StatePushOptions,
    StateRmOptions, StateShowOptions, Terraform, TerraformError, TerraformResult,
    ValidateOptions, VersionInfo, WorkspaceListOptions, WorkspaceShowOptions,
};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        if let Some(tf_err) = e.downcast_ref::<TerraformError>() {
            if let Some(command) = tf_err.command_line() {
                eprintln!("  command: {}", command);
            }
            let stderr = tf_err.stderr().trim();
            if !stderr.is_empty() {
                eprintln!("{}", stderr);
            }
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(dir) = &cli.chdir {
        settings.chdir = dir.clone();
    }
    if let Some(binary) = &cli.binary {
        settings.binary = binary.clone();
    }
    if cli.no_color {
        settings.color = false;
    }
    Ok(settings)
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    let mut tf = Terraform::new(settings);
    let json = cli.json;

    match cli.command {
        Command::Version => {
            let result = tf.version()?;
            output(&result, json, format_version_human)?;
        }
        Command::Init {
            backend_config,
            upgrade,
            reconfigure,
            migrate_state,
        } => {
            let opts = InitOptions {
                backend_config,
                upgrade: upgrade.then_some(true),
                reconfigure: reconfigure.then_some(true),
                migrate_state: migrate_state.then_some(true),
                ..Default::default()
            };
            output(&tf.init(&opts)?, json, format_text)?;
        }
        Command::Validate => {
            output(&tf.validate(&ValidateOptions::default())?, json, format_text)?;
        }
        Command::Fmt {
            check,
            recursive,
            target,
        } => {
            let opts = FmtOptions {
                check: check.then_some(true),
                recursive: recursive.then_some(true),
                target,
                ..Default::default()
            };
            output(&tf.fmt(&opts)?, json, format_text)?;
        }
        Command::Plan { out, destroy, run } => {
            let opts = PlanOptions {
                destroy: destroy.then_some(true),
                out,
                inputs: run_inputs(run)?,
                ..Default::default()
            };
            output(&tf.plan(&opts)?, json, format_plan_human)?;
        }
        Command::Apply {
            auto_approve,
            plan_file,
            run,
        } => {
            let opts = ApplyOptions {
                auto_approve: auto_approve.then_some(true),
                plan_file,
                inputs: run_inputs(run)?,
                ..Default::default()
            };
            output(&tf.apply(&opts)?, json, format_text)?;
        }
        Command::Destroy { auto_approve, run } => {
            let opts = DestroyOptions {
                auto_approve: auto_approve.then_some(true),
                inputs: run_inputs(run)?,
            };
            output(&tf.destroy(&opts)?, json, format_text)?;
        }
        Command::Show { path } => {
            let opts = ShowOptions {
                path,
                ..Default::default()
            };
            output(&tf.show(&opts)?, json, format_value_human)?;
        }
        Command::Output { name } => {
            let opts = OutputOptions {
                name,
                ..Default::default()
            };
            output(&tf.output(&opts)?, json, format_value_human)?;
        }
        Command::State { command } => run_state(&tf, command, json)?,
        Command::Workspace { command } => run_workspace(&mut tf, command, json)?,
    }
    Ok(())
}

fn run_state(tf: &Terraform, command: StateCommand, json: bool) -> Result<()> {
    let state = tf.state();
    match command {
        StateCommand::List {
            addresses,
            id,
            state: state_file,
        } => {
            let opts = StateListOptions {
                addresses,
                id,
                state: state_file,
                ..Default::default()
            };
            output(&state.list(&opts)?, json, format_text)?;
        }
        StateCommand::Show {
            address,
            state: state_file,
        } => {
            let opts = StateShowOptions {
                state: state_file,
                ..Default::default()
            };
            output(&state.show(&address, &opts)?, json, format_text)?;
        }
        StateCommand::Mv {
            source,
            destination,
            dry_run,
            no_lock,
            lock_timeout,
        } => {
            let opts = StateMvOptions {
                dry_run: dry_run.then_some(true),
                lock: no_lock.then_some(false),
                lock_timeout,
                ..Default::default()
            };
            output(&state.mv(&source, &destination, &opts)?, json, format_text)?;
        }
        StateCommand::Rm {
            address,
            dry_run,
            no_lock,
            lock_timeout,
        } => {
            let opts = StateRmOptions {
                dry_run: dry_run.then_some(true),
                lock: no_lock.then_some(false),
                lock_timeout,
                ..Default::default()
            };
            output(&state.rm(&address, &opts)?, json, format_text)?;
        }
        StateCommand::ReplaceProvider {
            from,
            to,
            auto_approve,
            no_lock,
            lock_timeout,
        } => {
            let opts = ReplaceProviderOptions {
                auto_approve: auto_approve.then_some(true),
                lock: no_lock.then_some(false),
                lock_timeout,
                ..Default::default()
            };
            output(&state.replace_provider(&from, &to, &opts)?, json, format_text)?;
        }
        StateCommand::Pull => {
            output(&state.pull(&StatePullOptions::default())?, json, format_text)?;
        }
        StateCommand::Push { path, force } => {
            let source = match path.as_deref() {
                None => None,
                Some("-") => {
                    let mut content = String::new();
                    std::io::stdin()
                        .read_to_string(&mut content)
                        .context("failed to read state from stdin")?;
                    Some(PushSource::Content(content))
                }
                Some(p) => Some(PushSource::File(PathBuf::from(p))),
            };
            let opts = StatePushOptions {
                force: force.then_some(true),
                ..Default::default()
            };
            output(&state.push(source, &opts)?, json, format_text)?;
        }
    }
    Ok(())
}

fn run_workspace(tf: &mut Terraform, command: WorkspaceCommand, json: bool) -> Result<()> {
    let mut workspace = tf.workspace();
    match command {
        WorkspaceCommand::List => {
            let result = workspace.list(&WorkspaceListOptions::default())?;
            let current = tf.current_workspace().to_string();
            output(&result, json, |names| format_workspaces_human(names, &current))?;
        }
        WorkspaceCommand::Show => {
            output(&workspace.show(&WorkspaceShowOptions::default())?, json, format_text)?;
        }
        WorkspaceCommand::Select { name, or_create } => {
            let opts = SelectOptions {
                or_create,
                ..Default::default()
            };
            output(&workspace.select(&name, &opts)?, json, format_text)?;
        }
        WorkspaceCommand::New { name, state } => {
            let opts = NewOptions {
                state,
                ..Default::default()
            };
            output(&workspace.new(&name, &opts)?, json, format_text)?;
        }
        WorkspaceCommand::Delete { name, force } => {
            let opts = DeleteOptions {
                force: force.then_some(true),
                ..Default::default()
            };
            output(&workspace.delete(&name, &opts)?, json, format_text)?;
        }
    }
    Ok(())
}

fn run_inputs(run: RunArgs) -> Result<RunInputs> {
    let mut vars = BTreeMap::new();
    for raw in run.vars {
        match raw.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                vars.insert(key.to_string(), value.to_string());
            }
            _ => {
                bail!(
                    "invalid --var format: {:?}\n  hint: use --var name=value",
                    raw
                );
            }
        }
    }
    Ok(RunInputs {
        vars,
        var_files: run.var_files,
        targets: run.targets,
        parallelism: run.parallelism,
        lock: run.no_lock.then_some(false),
        lock_timeout: run.lock_timeout,
        ..Default::default()
    })
}

fn output<T: Serialize>(
    result: &TerraformResult<T>,
    json: bool,
    human_fn: impl Fn(&T) -> String,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        let text = human_fn(&result.result);
        if !text.is_empty() {
            println!("{}", text);
        }
    }
    Ok(())
}

fn format_text(text: &String) -> String {
    text.trim_end().to_string()
}

fn format_version_human(info: &VersionInfo) -> String {
    let mut line = format!("Terraform v{}", info.version_str);
    if !info.platform.is_empty() {
        line.push_str(&format!(" on {}", info.platform));
    }
    if !info.latest {
        line.push_str(" (update available)");
    }
    line
}

fn format_plan_human(plan: &PlanOutput) -> String {
    let mut text = plan.stdout.trim_end().to_string();
    if let Some(file) = &plan.plan_file {
        text.push_str(&format!("\n\nSaved plan to {}", file.display()));
    }
    text
}

fn format_value_human(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn format_workspaces_human(names: &Vec<String>, current: &str) -> String {
    names
        .iter()
        .map(|name| {
            if name == current {
                format!("* {}", name)
            } else {
                format!("  {}", name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
