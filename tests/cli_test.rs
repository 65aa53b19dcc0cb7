use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

/// Runs the binary with an empty config file so the user's own config and
/// environment never leak into a test.
fn terrabind(config_dir: &Path) -> Command {
    let config = config_dir.join("config.toml");
    std::fs::write(&config, "").unwrap();
    let mut cmd = Command::cargo_bin("terrabind").unwrap();
    cmd.env_remove("TERRABIND_BINARY")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

#[cfg(unix)]
fn fake_terraform(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
case "$1 $2" in
  "version -json")
    echo '{"terraform_version":"1.5.7","platform":"linux_amd64","terraform_outdated":false}'
    ;;
  "workspace list")
    printf '  default\n* staging\n  prod\n'
    ;;
  "state push")
    test -f "$3" || { echo "missing $3" >&2; exit 1; }
    cat "$3"
    ;;
  "state pull")
    echo "Error: Failed to load state: backend unreachable" >&2
    exit 1
    ;;
  *)
    echo "unexpected: $*" >&2
    exit 1
    ;;
esac
"#;
    let path = dir.join("fake-terraform");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn help_exits_zero() {
    Command::cargo_bin("terrabind")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("workspace"));
}

#[test]
fn no_args_shows_help() {
    Command::cargo_bin("terrabind").unwrap().assert().failure();
}

#[test]
fn state_push_without_source_fails_before_spawning() {
    let tmp = tempfile::tempdir().unwrap();
    terrabind(tmp.path())
        .args(["--binary", "/nonexistent/terraform", "state", "push"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to run terraform state push",
        ))
        .stderr(predicate::str::contains("No file path or content provided"));
}

#[test]
fn missing_binary_reports_command_line() {
    let tmp = tempfile::tempdir().unwrap();
    terrabind(tmp.path())
        .arg("--chdir")
        .arg(tmp.path())
        .args(["--binary", "/nonexistent/terraform", "state", "pull"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains(
            "command: /nonexistent/terraform state pull",
        ));
}

#[test]
fn invalid_var_format_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    terrabind(tmp.path())
        .args(["--binary", "/nonexistent/terraform", "plan", "--var", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --var format"));
}

#[test]
fn invalid_config_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tmp.path().join("bad.toml");
    std::fs::write(&config, "[terraform]\nparallelism = 0\n").unwrap();
    Command::cargo_bin("terrabind")
        .unwrap()
        .env_remove("TERRABIND_BINARY")
        .arg("--config")
        .arg(&config)
        .args(["workspace", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parallelism must be at least 1"));
}

#[cfg(unix)]
#[test]
fn workspace_list_json() {
    let tmp = tempfile::tempdir().unwrap();
    let fake = fake_terraform(tmp.path());
    terrabind(tmp.path())
        .arg("--chdir")
        .arg(tmp.path())
        .arg("--binary")
        .arg(&fake)
        .args(["--json", "workspace", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("\"staging\""))
        .stdout(predicate::str::contains("*").not());
}

#[cfg(unix)]
#[test]
fn workspace_list_human_marks_current() {
    let tmp = tempfile::tempdir().unwrap();
    let fake = fake_terraform(tmp.path());
    terrabind(tmp.path())
        .arg("--chdir")
        .arg(tmp.path())
        .arg("--binary")
        .arg(&fake)
        .args(["workspace", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* staging"))
        .stdout(predicate::str::contains("  prod"));
}

#[cfg(unix)]
#[test]
fn version_human_output() {
    let tmp = tempfile::tempdir().unwrap();
    let fake = fake_terraform(tmp.path());
    terrabind(tmp.path())
        .arg("--chdir")
        .arg(tmp.path())
        .arg("--binary")
        .arg(&fake)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Terraform v1.5.7 on linux_amd64"));
}

#[cfg(unix)]
#[test]
fn state_push_from_stdin_removes_temp_file() {
    let tmp = tempfile::tempdir().unwrap();
    let fake = fake_terraform(tmp.path());
    terrabind(tmp.path())
        .arg("--chdir")
        .arg(tmp.path())
        .arg("--binary")
        .arg(&fake)
        .args(["state", "push", "-"])
        .write_stdin(r#"{"version":4,"serial":7}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""serial":7"#));

    let leftovers: Vec<_> = std::fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("terraform-temp-state-")
        })
        .collect();
    assert!(leftovers.is_empty());
}

#[cfg(unix)]
#[test]
fn failing_subcommand_prints_stderr() {
    let tmp = tempfile::tempdir().unwrap();
    let fake = fake_terraform(tmp.path());
    terrabind(tmp.path())
        .arg("--chdir")
        .arg(tmp.path())
        .arg("--binary")
        .arg(&fake)
        .args(["state", "pull"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to run terraform state pull",
        ))
        .stderr(predicate::str::contains("backend unreachable"));
}
