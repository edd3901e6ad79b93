use std::process::Command;

use super::{AgentError, Assistant, Invocation};

pub struct Aider {
    command: String,
    base_args: Vec<String>,
}

impl Aider {
    pub fn new(command: Option<String>, base_args: Option<Vec<String>>) -> Self {
        Self {
            command: command.unwrap_or_else(|| "aider".to_string()),
            base_args: base_args.unwrap_or_default(),
        }
    }

    /// Arguments after the command name, in aider's CLI vocabulary.
    fn args(&self, invocation: &Invocation) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.push(invocation.target.to_string_lossy().to_string());

        for path in &invocation.read_only {
            args.push("--read".to_string());
            args.push(path.to_string_lossy().to_string());
        }

        if let Some(cfg) = &invocation.config_file {
            args.push("--config".to_string());
            args.push(cfg.to_string_lossy().to_string());
        }

        if invocation.auto_accept {
            args.push("--yes-always".to_string());
        }
        if !invocation.restore_history {
            args.push("--no-restore-chat-history".to_string());
        }

        args.push("--message".to_string());
        args.push(invocation.message.clone());
        args
    }
}

impl Assistant for Aider {
    fn invoke(&self, invocation: &Invocation) -> Result<(), AgentError> {
        let args = self.args(invocation);
        tracing::debug!("running {} with {} argument(s)", self.command, args.len());

        let status = Command::new(&self.command)
            .args(&args)
            .current_dir(&invocation.workdir)
            .status()
            .map_err(|source| AgentError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(AgentError::Failed {
                command: self.command.clone(),
                code: status.code(),
            });
        }
        Ok(())
    }

    fn command_line(&self, invocation: &Invocation) -> Vec<String> {
        let mut argv = vec![self.command.clone()];
        argv.extend(self.args(invocation));
        argv
    }
}
