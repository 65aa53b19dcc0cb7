#![cfg(test)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::Settings;
use crate::runner::{CommandRunner, ProcessOutput};
use crate::terraform::Terraform;

#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Arguments that named an existing file in `cwd` at call time, with its
    /// contents.
    pub files: Vec<(String, String)>,
}

enum Scripted {
    Output(ProcessOutput),
    SpawnError,
}

#[derive(Default)]
struct FakeState {
    responses: VecDeque<Scripted>,
    calls: Vec<Call>,
}

/// Scripted runner. Clones share state, so a test keeps one clone for
/// assertions after handing the other to a [`Terraform`].
#[derive(Clone, Default)]
pub struct FakeRunner {
    inner: Rc<RefCell<FakeState>>,
}

impl FakeRunner {
    pub fn ok(&self, stdout: &str) -> &Self {
        self.push(Scripted::Output(ProcessOutput {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }))
    }

    pub fn fail(&self, stderr: &str) -> &Self {
        self.push(Scripted::Output(ProcessOutput {
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }))
    }

    pub fn spawn_error(&self) -> &Self {
        self.push(Scripted::SpawnError)
    }

    fn push(&self, response: Scripted) -> &Self {
        self.inner.borrow_mut().responses.push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.borrow().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.borrow().calls.len()
    }

    /// Argument vector of the `n`th call.
    pub fn args(&self, n: usize) -> Vec<String> {
        self.inner.borrow().calls[n].args.clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<ProcessOutput> {
        let files = args
            .iter()
            .filter_map(|arg| {
                let path = cwd.join(arg);
                if path.is_file() {
                    std::fs::read_to_string(&path)
                        .ok()
                        .map(|content| (arg.clone(), content))
                } else {
                    None
                }
            })
            .collect();

        let mut state = self.inner.borrow_mut();
        state.calls.push(Call {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
            files,
        });

        match state.responses.pop_front() {
            Some(Scripted::Output(out)) => Ok(out),
            Some(Scripted::SpawnError) => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: not found", program),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("no scripted response for {:?}", args),
            )),
        }
    }
}

/// Handle rooted at `dir` with a fake runner behind it.
pub fn fake_terraform(dir: &Path) -> (Terraform, FakeRunner) {
    let fake = FakeRunner::default();
    let settings = Settings {
        chdir: dir.to_path_buf(),
        ..Settings::default()
    };
    (Terraform::with_runner(settings, fake.clone()), fake)
}

pub fn version_json(version: &str) -> String {
    format!(
        r#"{{"terraform_version":"{}","platform":"linux_amd64","provider_selections":{{}},"terraform_outdated":false}}"#,
        version
    )
}

/// Names of leftover temp state files in `dir`.
pub fn temp_state_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("terraform-temp-state-"))
        .collect()
}
