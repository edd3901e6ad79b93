mod agent;
mod config;
mod init;
mod instructions;
mod run;
mod select;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::agent::AgentError;

#[derive(Parser)]
#[command(
    name = "docs-improve",
    version,
    about = "Ask an AI coding assistant to improve one random README"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,

    /// Repository root to scan
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (default: docs-improve.toml in the root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a README and run the assistant on it (the default)
    Run(RunArgs),
    /// Print every candidate README, one per line
    List,
    /// Print the instruction text sent to the assistant
    Prompt,
    /// Write a default docs-improve.toml in the root
    Init,
}

#[derive(Args)]
struct RunArgs {
    /// Agent backend to use
    #[arg(long)]
    agent: Option<String>,
    /// Seed the random pick for a reproducible choice
    #[arg(long)]
    seed: Option<u64>,
    /// Print the selection and command without running the assistant
    #[arg(long)]
    dry_run: bool,
}

impl RunArgs {
    fn is_set(&self) -> bool {
        self.agent.is_some() || self.seed.is_some() || self.dry_run
    }

    /// `self` wins over options given before the subcommand.
    fn or(&self, outer: &RunArgs) -> RunArgs {
        RunArgs {
            agent: self.agent.clone().or_else(|| outer.agent.clone()),
            seed: self.seed.or(outer.seed),
            dry_run: self.dry_run || outer.dry_run,
        }
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "docs_improve=info",
        1 => "docs_improve=debug",
        _ => "docs_improve=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(cli: Cli) -> Result<()> {
    let load = || config::load(&cli.root, cli.config.as_deref());

    match &cli.command {
        None => run_pipeline(&cli.root, &load()?, &cli.run),
        Some(Commands::Run(args)) => run_pipeline(&cli.root, &load()?, &args.or(&cli.run)),
        Some(_) if cli.run.is_set() => {
            anyhow::bail!("--agent, --seed and --dry-run only apply to run")
        }
        Some(Commands::List) => {
            let config = load()?;
            let filter = select::Filter::from(&config.select);
            let found = select::candidates(&cli.root, &filter)?;
            if found.is_empty() {
                tracing::warn!("no candidates under {}", cli.root.display());
            }
            for path in found {
                println!("{}", path.display());
            }
            Ok(())
        }
        Some(Commands::Prompt) => {
            let config = load()?;
            let text = instructions::load(&cli.root, config.instructions.as_deref())?;
            print!("{}", text);
            Ok(())
        }
        Some(Commands::Init) => init::run(&cli.root),
    }
}

fn run_pipeline(root: &Path, config: &config::Config, args: &RunArgs) -> Result<()> {
    run::run(root, config, args.agent.as_deref(), args.seed, args.dry_run)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            // A failing assistant's own status becomes ours.
            let code = err
                .downcast_ref::<AgentError>()
                .map_or(1, AgentError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
