use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths::expand_tilde;

pub const BINARY_ENV: &str = "TERRABIND_BINARY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub terraform: RawSettings,
}

/// Every key is optional in the file; see [`Settings`] for the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    pub binary: Option<String>,
    pub chdir: Option<PathBuf>,
    pub workspace: Option<String>,
    pub lock: Option<bool>,
    pub lock_timeout: Option<String>,
    pub input: Option<bool>,
    pub parallelism: Option<u32>,
    pub color: Option<bool>,
    pub auto_approve: Option<bool>,
    pub var_file: Option<PathBuf>,
}

/// Resolved defaults for a [`crate::Terraform`] handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub binary: String,
    pub chdir: PathBuf,
    pub workspace: String,
    pub lock: bool,
    pub lock_timeout: String,
    pub input: bool,
    pub parallelism: u32,
    pub color: bool,
    pub auto_approve: bool,
    pub var_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            binary: "terraform".to_string(),
            chdir: PathBuf::from("."),
            workspace: "default".to_string(),
            lock: true,
            lock_timeout: crate::args::DEFAULT_LOCK_TIMEOUT.to_string(),
            input: false,
            parallelism: 10,
            color: true,
            auto_approve: false,
            var_file: None,
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", "terrabind")
        .context("could not determine config directory")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Loads `path`, or the default location when `path` is `None`. A missing
/// default file yields the built-in defaults; a missing explicit file is an
/// error.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(p) => load_config(p)?,
        None => {
            let default_path = default_config_path()?;
            if default_path.exists() {
                load_config(&default_path)?
            } else {
                Settings::default()
            }
        }
    };
    apply_env(&mut settings);
    Ok(settings)
}

pub fn load_config(path: &Path) -> Result<Settings> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<Settings> {
    let raw: ConfigFile = toml::from_str(contents).context("failed to parse config TOML")?;
    resolve(raw.terraform)
}

fn resolve(raw: RawSettings) -> Result<Settings> {
    let defaults = Settings::default();

    let binary = raw.binary.unwrap_or(defaults.binary);
    if binary.trim().is_empty() {
        bail!("binary must not be empty");
    }

    let parallelism = raw.parallelism.unwrap_or(defaults.parallelism);
    if parallelism == 0 {
        bail!("parallelism must be at least 1");
    }

    let lock_timeout = raw.lock_timeout.unwrap_or(defaults.lock_timeout);
    if !is_valid_timeout(&lock_timeout) {
        bail!(
            "invalid lock_timeout {:?}\n  hint: use a number followed by s, m or h (e.g. \"30s\")",
            lock_timeout
        );
    }

    let chdir = raw
        .chdir
        .map(|p| expand_tilde(&p.to_string_lossy()))
        .unwrap_or(defaults.chdir);
    let var_file = raw.var_file.map(|p| expand_tilde(&p.to_string_lossy()));

    Ok(Settings {
        binary: expand_tilde(&binary).to_string_lossy().into_owned(),
        chdir,
        workspace: raw.workspace.unwrap_or(defaults.workspace),
        lock: raw.lock.unwrap_or(defaults.lock),
        lock_timeout,
        input: raw.input.unwrap_or(defaults.input),
        parallelism,
        color: raw.color.unwrap_or(defaults.color),
        auto_approve: raw.auto_approve.unwrap_or(defaults.auto_approve),
        var_file,
    })
}

fn apply_env(settings: &mut Settings) {
    if let Ok(binary) = std::env::var(BINARY_ENV) {
        if !binary.trim().is_empty() {
            settings.binary = binary;
        }
    }
}

fn is_valid_timeout(value: &str) -> bool {
    match value.char_indices().last() {
        Some((idx, unit)) if matches!(unit, 's' | 'm' | 'h') => {
            let digits = &value[..idx];
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}
