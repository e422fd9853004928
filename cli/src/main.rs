mod config;
mod error;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use minelab_core::{EvalReport, HeuristicAgent, RandomAgent, evaluate};

use config::{AgentKind, AppConfig};

#[derive(Parser)]
#[command(name = "minelab", version, about = "Minesweeper agent evaluation harness")]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play many seeded games with an agent and report aggregate results
    Eval(EvalArgs),
    /// Print the default configuration as TOML
    DefaultConfig,
}

#[derive(Args)]
struct EvalArgs {
    /// Path to TOML config file
    #[arg(short, long, default_value = "minelab.toml")]
    config: PathBuf,

    /// Agent to evaluate (overrides config)
    #[arg(short, long, value_enum)]
    agent: Option<AgentKind>,

    /// Number of games (overrides config)
    #[arg(short, long)]
    games: Option<usize>,

    /// Master seed (overrides config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Eval(args) => run_eval(args),
        Command::DefaultConfig => {
            print!("{}", AppConfig::default_toml());
            Ok(())
        }
    }
}

fn run_eval(args: EvalArgs) -> Result<()> {
    let mut config = AppConfig::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    if let Some(kind) = args.agent {
        config.agent.kind = kind;
    }
    if let Some(games) = args.games {
        config.evaluation.games = games;
    }
    if let Some(seed) = args.seed {
        config.evaluation.seed = seed;
    }
    config.validate().context("invalid configuration")?;

    let board = config.board;
    log::info!(
        "evaluating {:?} agent on {}x{} with {} mines, {} games, seed {}",
        config.agent.kind,
        board.rows,
        board.cols,
        board.mines,
        config.evaluation.games,
        config.evaluation.seed
    );

    let eval_config = config.eval_config();
    let report = match config.agent.kind {
        AgentKind::Random => {
            let flag_probability = config.agent.flag_probability;
            evaluate(
                |seed| RandomAgent::new(seed).with_flag_probability(flag_probability),
                &eval_config,
            )
        }
        AgentKind::Heuristic => evaluate(|_| HeuristicAgent::new(), &eval_config),
    }
    .context("evaluation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &EvalReport) {
    let summary = &report.summary;
    println!("agent:            {}", summary.agent);
    println!("games:            {}", summary.games);
    println!(
        "won / lost / stuck: {} / {} / {}",
        summary.wins, summary.losses, summary.stuck
    );
    println!("win rate:         {:.2}%", summary.win_rate * 100.0);
    println!("avg moves:        {:.2}", summary.avg_moves);
    println!("avg moves (won):  {:.2}", summary.avg_moves_on_win);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_eval_overrides() {
        let cli = Cli::try_parse_from([
            "minelab", "-v", "eval", "--agent", "random", "--games", "5", "--seed", "7", "--json",
        ])
        .unwrap();
        let Command::Eval(args) = cli.command else {
            panic!("expected eval subcommand");
        };
        assert_eq!(args.agent, Some(AgentKind::Random));
        assert_eq!(args.games, Some(5));
        assert_eq!(args.seed, Some(7));
        assert!(args.json);
        assert_eq!(args.config, PathBuf::from("minelab.toml"));
    }
}
