//! Flag token construction for terraform invocations.
//!
//! Every function here is pure: it maps an optional value to zero or one
//! token. Callers decide the fallback order before calling in.

use std::collections::BTreeMap;

/// Lock timeout that terraform treats as "wait forever is off". Not emitted.
pub const DEFAULT_LOCK_TIMEOUT: &str = "0s";

fn flag_name(name: &str) -> String {
    format!("-{}", name.replace('_', "-"))
}

/// Three-state boolean flag: unset emits nothing, `true` enables, `false`
/// emits the explicit disable form.
pub fn switch(name: &str, value: Option<bool>) -> Option<String> {
    match value {
        None => None,
        Some(true) => Some(flag_name(name)),
        Some(false) => Some(format!("{}=false", flag_name(name))),
    }
}

/// Valued flag. Empty strings are treated the same as unset.
pub fn text(name: &str, value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() => Some(format!("{}={}", flag_name(name), v)),
        _ => None,
    }
}

pub fn number(name: &str, value: Option<u32>) -> Option<String> {
    value.map(|n| format!("{}={}", flag_name(name), n))
}

/// Terraform only knows the negative form of color.
pub fn color(enabled: bool) -> Option<String> {
    (!enabled).then(|| "-no-color".to_string())
}

/// One `-name=value` token per entry, in order.
pub fn repeated(name: &str, values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| text(name, Some(v)))
        .collect()
}

/// `-var=key=value` tokens, sorted by key so the command line is stable.
pub fn vars(values: &BTreeMap<String, String>) -> Vec<String> {
    values
        .iter()
        .map(|(k, v)| format!("-var={}={}", k, v))
        .collect()
}

/// Lock flags after fallback: `-lock=false` only when locking is off,
/// `-lock-timeout` only when it differs from the default.
pub fn lock(effective_lock: bool, effective_timeout: &str) -> Vec<String> {
    let mut out = Vec::new();
    if !effective_lock {
        out.extend(switch("lock", Some(false)));
    }
    if effective_timeout != DEFAULT_LOCK_TIMEOUT {
        out.extend(text("lock_timeout", Some(effective_timeout)));
    }
    out
}

/// Ordered argument vector. Unset flags collapse away on push.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ArgList(Vec<String>);

impl ArgList {
    pub fn new(subcommand: &[&str]) -> Self {
        Self(subcommand.iter().map(|s| s.to_string()).collect())
    }

    pub fn flag(&mut self, token: Option<String>) -> &mut Self {
        self.0.extend(token);
        self
    }

    pub fn flags(&mut self, tokens: impl IntoIterator<Item = String>) -> &mut Self {
        self.0.extend(tokens);
        self
    }

    pub fn positional(&mut self, value: impl Into<String>) -> &mut Self {
        self.0.push(value.into());
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Shell-safe rendering of a full command line, for logs and errors.
pub fn render_command_line(program: &str, args: &[String]) -> String {
    let mut words = Vec::with_capacity(args.len() + 1);
    words.push(program);
    words.extend(args.iter().map(String::as_str));
    shell_words::join(words)
}
