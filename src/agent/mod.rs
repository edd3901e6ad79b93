pub mod aider;

use anyhow::Result;
use std::path::PathBuf;

use crate::config::AgentConfig;

/// One assistant run: which file to edit, what to read, what to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Directory the assistant runs in; other paths are relative to it.
    pub workdir: PathBuf,
    /// The only file the assistant may edit.
    pub target: PathBuf,
    /// Files added to the chat read-only.
    pub read_only: Vec<PathBuf>,
    /// The assistant's own config file.
    pub config_file: Option<PathBuf>,
    pub message: String,
    /// Accept every proposed edit without asking.
    pub auto_accept: bool,
    /// Reload chat history from earlier runs.
    pub restore_history: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with {}", describe(.code))]
    Failed { command: String, code: Option<i32> },
}

fn describe(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "a signal".to_string(),
    }
}

impl AgentError {
    /// Exit code the process should end with.
    pub fn exit_code(&self) -> i32 {
        match self {
            AgentError::Failed { code: Some(c), .. } if *c != 0 => *c,
            _ => 1,
        }
    }
}

/// Assistant backend trait: run one invocation to completion.
pub trait Assistant {
    fn invoke(&self, invocation: &Invocation) -> Result<(), AgentError>;

    /// The full command line `invoke` would run, for dry runs and logs.
    fn command_line(&self, invocation: &Invocation) -> Vec<String>;
}

/// Resolve an assistant backend by name.
pub fn resolve(name: &str, config: Option<&AgentConfig>) -> Result<Box<dyn Assistant>> {
    match (name, config) {
        (_, Some(ac)) => Ok(Box::new(aider::Aider::new(
            Some(ac.command.clone()),
            Some(ac.args.clone()),
        ))),
        ("aider", None) => Ok(Box::new(aider::Aider::new(None, None))),
        (other, None) => anyhow::bail!("Unknown agent backend: {}", other),
    }
}
