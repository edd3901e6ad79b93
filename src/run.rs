//! The pipeline: collect candidates, pick one, hand it to the assistant.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

use crate::agent::{self, Assistant, Invocation};
use crate::config::{AgentConfig, Config};
use crate::instructions;
use crate::select::{self, Filter};

const DEFAULT_AGENT: &str = "aider";

/// Entry point for `docs-improve run`.
pub fn run(
    root: &Path,
    config: &Config,
    agent_name: Option<&str>,
    seed: Option<u64>,
    dry_run: bool,
) -> Result<()> {
    let agent_name = agent_name
        .or(config.default_agent.as_deref())
        .unwrap_or(DEFAULT_AGENT);
    let agent_config = config.agents.get(agent_name);
    let backend = agent::resolve(agent_name, agent_config)?;

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    run_with(root, config, agent_config, backend.as_ref(), &mut rng, dry_run)
}

/// Same as [`run`] with the backend and random source supplied.
pub fn run_with<R: Rng + ?Sized>(
    root: &Path,
    config: &Config,
    agent_config: Option<&AgentConfig>,
    backend: &dyn Assistant,
    rng: &mut R,
    dry_run: bool,
) -> Result<()> {
    let filter = Filter::from(&config.select);
    let found = select::candidates(root, &filter)?;
    let target = select::pick(&found, rng).with_context(|| {
        format!(
            "no {} containing {:?} under {}",
            filter.file_name,
            filter.segment,
            root.display()
        )
    })?;
    tracing::info!("selected {} of {} candidate(s)", target.display(), found.len());

    let reference = root.join(&config.reference);
    if !reference.is_file() {
        anyhow::bail!("reference README not found: {}", reference.display());
    }

    let message = instructions::load(root, config.instructions.as_deref())?;
    let invocation = build_invocation(root, target, config, agent_config, &message);

    if dry_run {
        let argv = backend.command_line(&invocation);
        println!("{}", target.display());
        if let Some((_, head)) = argv.split_last() {
            eprintln!("--- Would run (message elided) ---");
            eprintln!("{}", shell_words(head));
        }
        eprintln!("--- Message is {} bytes ---", invocation.message.len());
        return Ok(());
    }

    backend.invoke(&invocation)?;
    tracing::info!("assistant finished on {}", target.display());
    Ok(())
}

/// Join `argv` so it can be pasted into a POSIX shell.
fn shell_words(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            let plain = !arg.is_empty()
                && arg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
            if plain {
                arg.clone()
            } else {
                format!("'{}'", arg.replace('\'', "'\\''"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Describe the run for `target`: the reference is the only read-only file.
pub fn build_invocation(
    root: &Path,
    target: &Path,
    config: &Config,
    agent_config: Option<&AgentConfig>,
    message: &str,
) -> Invocation {
    let defaults = AgentConfig::default();
    let ac = agent_config.unwrap_or(&defaults);
    Invocation {
        workdir: root.to_path_buf(),
        target: target.to_path_buf(),
        read_only: vec![config.reference.clone()],
        config_file: ac.tool_config().map(Path::to_path_buf),
        message: message.to_string(),
        auto_accept: ac.auto_accept,
        restore_history: ac.restore_history,
    }
}
