//! External command execution
//!
//! Desktop queries go through [`CommandRunner`] so they can be exercised
//! without a real Xfce session.

use duct::cmd;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{program} not found on PATH")]
    NotFound { program: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    pub fn program(&self) -> &str {
        match self {
            ProcessError::NotFound { program } | ProcessError::Spawn { program, .. } => program,
        }
    }
}

/// Captured result of a finished command. A nonzero exit is not an error at
/// this layer; callers decide what a failure means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Short description of a failed run for log messages
    pub fn failure_summary(&self) -> String {
        let stderr = self.stderr.trim();
        match (self.code, stderr.is_empty()) {
            (Some(code), true) => format!("exit code {}", code),
            (Some(code), false) => format!("exit code {}: {}", code, stderr),
            (None, true) => "terminated by signal".to_string(),
            (None, false) => format!("terminated by signal: {}", stderr),
        }
    }
}

pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ProcessError>;
}

/// Runs commands on the host, resolving the program through `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn resolve(program: &str) -> Result<PathBuf, ProcessError> {
        which::which(program).map_err(|_| ProcessError::NotFound {
            program: program.to_string(),
        })
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ProcessError> {
        let path = Self::resolve(program)?;
        let output = cmd(path, args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|source| ProcessError::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
