use std::path::{Path, PathBuf};

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    } else if path == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home);
        }
    }
    PathBuf::from(path)
}

/// Per-call override wins over the handle's directory.
pub fn working_dir<'a>(override_dir: Option<&'a Path>, default_dir: &'a Path) -> &'a Path {
    override_dir.unwrap_or(default_dir)
}
