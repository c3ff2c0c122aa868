//! Authentication Triage Core - Q-learning decision engine CLI.
//!
//! Subcommands map one-to-one onto the engine's operating modes:
//! - `train`: online epsilon-greedy training (with optional warm start)
//! - `replay`: offline expectation-based update from the decision log
//! - `eval`: greedy-policy evaluation against a labeled dataset
//! - `show`: Q-table inspection by row, state, or in full
//! - `check`: configuration validation
//!
//! Command payloads are JSON on stdout; logs go to stderr.

use at_common::{Error, Result};
use at_config::{EngineConfig, PresetName};
use at_core::exit_codes::ExitCode;
use at_core::logging::{self, LogFormat};
use at_core::{
    evaluate, LabeledDataset, LogStore, OfflineUpdater, QTable, StateSpace, Trainer,
};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Authentication Triage Core - risk-feature Q-learning decision engine
#[derive(Parser)]
#[command(name = "at-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to an engine configuration file (JSON)
    #[arg(long, global = true, env = "AT_CONFIG")]
    config: Option<PathBuf>,

    /// Built-in preset to use when no config file is given
    #[arg(long, global = true)]
    preset: Option<PresetName>,

    /// Override the configured RNG seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    log_format: LogFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (warnings and errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the Q-table with simulated epsilon-greedy episodes
    Train(TrainArgs),

    /// Replay unprocessed decision-log records into the Q-table
    Replay(ReplayArgs),

    /// Evaluate the greedy policy against a labeled dataset
    Eval(EvalArgs),

    /// Print Q-table rows
    Show(ShowArgs),

    /// Validate configuration and list presets
    Check,

    /// Print version information
    Version,
}

#[derive(Args)]
struct TrainArgs {
    /// Q-table artifact to write
    #[arg(long, default_value = "q_table.json")]
    qtable: PathBuf,

    /// Continue from an existing artifact instead of a zeroed table
    #[arg(long)]
    resume: bool,

    /// Historical (state, action) CSV replayed before online training
    #[arg(long)]
    warm_start: Option<PathBuf>,

    /// Held-out labeled CSV for periodic checkpoint evaluation
    #[arg(long)]
    validation: Option<PathBuf>,
}

#[derive(Args)]
struct ReplayArgs {
    /// Q-table artifact to update (must exist)
    #[arg(long, default_value = "q_table.json")]
    qtable: PathBuf,

    /// Decision log store (JSONL)
    #[arg(long)]
    log: PathBuf,
}

#[derive(Args)]
struct EvalArgs {
    /// Q-table artifact to read
    #[arg(long, default_value = "q_table.json")]
    qtable: PathBuf,

    /// Labeled validation CSV
    #[arg(long)]
    dataset: PathBuf,
}

#[derive(Args)]
struct ShowArgs {
    /// Q-table artifact to read
    #[arg(long, default_value = "q_table.json")]
    qtable: PathBuf,

    /// Print one row by index
    #[arg(long, conflicts_with = "state")]
    idx: Option<usize>,

    /// Print one state, as digits ("0101000") or separate values
    state: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.global.verbose, cli.global.quiet, cli.global.log_format);

    let code = match run(cli) {
        Ok(()) => ExitCode::Ok,
        Err(err) => {
            tracing::error!(code = err.code(), category = %err.category(), "{err}");
            ExitCode::from_error(&err)
        }
    };
    std::process::exit(code.code());
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Train(args) => cmd_train(&cli.global, &args),
        Commands::Replay(args) => cmd_replay(&cli.global, &args),
        Commands::Eval(args) => cmd_eval(&cli.global, &args),
        Commands::Show(args) => cmd_show(&cli.global, &args),
        Commands::Check => cmd_check(&cli.global),
        Commands::Version => {
            println!("at-core {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Resolve configuration: explicit file, then preset, then the command's
/// default preset.
fn resolve_config(global: &GlobalOpts, default_preset: PresetName) -> Result<EngineConfig> {
    let mut config = match (&global.config, global.preset) {
        (Some(path), _) => EngineConfig::load(Some(path))?,
        (None, Some(preset)) => preset.config(),
        (None, None) => default_preset.config(),
    };
    if let Some(seed) = global.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn cmd_train(global: &GlobalOpts, args: &TrainArgs) -> Result<()> {
    let config = resolve_config(global, PresetName::BalancedMfa)?;
    let mut trainer = Trainer::new(&config);
    let states = trainer.space().len();

    let mut table = if args.resume && args.qtable.exists() {
        QTable::load(&args.qtable, states)?
    } else {
        QTable::zeroed(states)
    };

    let warm_start_updates = match &args.warm_start {
        Some(path) => {
            let dataset = LabeledDataset::load_csv(path, trainer.space())?;
            let updates = trainer.warm_start(&mut table, &dataset)?;
            tracing::info!(updates, "warm start complete");
            updates
        }
        None => 0,
    };

    let holdout = args
        .validation
        .as_deref()
        .map(|path| LabeledDataset::load_csv(path, trainer.space()))
        .transpose()?;

    let mut report = trainer.run(&mut table, holdout.as_ref())?;
    report.warm_start_updates = warm_start_updates;
    table.save(&args.qtable)?;

    print_payload(&serde_json::json!({
        "qtable": args.qtable.display().to_string(),
        "states": states,
        "report": report,
    }))
}

fn cmd_replay(global: &GlobalOpts, args: &ReplayArgs) -> Result<()> {
    let config = resolve_config(global, PresetName::Offline5d)?;
    let updater = OfflineUpdater::new(&config);

    let store = LogStore::new(&args.log);
    let mut records = store.load()?;
    let mut table = QTable::load(&args.qtable, updater.space().len())?;

    let report = updater.apply_batch(&mut table, &mut records)?;

    // One save each at the end: the batch is all-or-nothing on disk.
    table.save(&args.qtable)?;
    store.save(&records)?;

    print_payload(&serde_json::json!({
        "qtable": args.qtable.display().to_string(),
        "log": args.log.display().to_string(),
        "report": report,
    }))
}

fn cmd_eval(global: &GlobalOpts, args: &EvalArgs) -> Result<()> {
    let config = resolve_config(global, PresetName::BalancedMfa)?;
    let space = StateSpace::new(&config.features);

    let table = QTable::load(&args.qtable, space.len())?;
    let dataset = LabeledDataset::load_csv(&args.dataset, &space)?;
    let report = evaluate(&table, &space, &dataset)?;

    print_payload(&serde_json::json!({
        "qtable": args.qtable.display().to_string(),
        "dataset": args.dataset.display().to_string(),
        "report": report,
    }))
}

fn cmd_show(global: &GlobalOpts, args: &ShowArgs) -> Result<()> {
    let config = resolve_config(global, PresetName::BalancedMfa)?;
    let space = StateSpace::new(&config.features);
    let table = QTable::load(&args.qtable, space.len())?;

    print_show_header(&space);
    if let Some(idx) = args.idx {
        let state = space.state(idx)?;
        print_show_row(idx, &state, &table);
    } else if !args.state.is_empty() {
        let state = parse_state_args(&args.state, space.arity())?;
        let idx = space.index(&state)?;
        print_show_row(idx, &state, &table);
    } else {
        for (idx, state) in space.iter().enumerate() {
            print_show_row(idx, &state, &table);
        }
    }
    Ok(())
}

fn cmd_check(global: &GlobalOpts) -> Result<()> {
    let config = resolve_config(global, PresetName::BalancedMfa)?;
    let presets: Vec<_> = PresetName::ALL
        .iter()
        .map(|p| {
            serde_json::json!({
                "name": p.as_str(),
                "description": p.description(),
                "states": p.config().state_count(),
            })
        })
        .collect();

    print_payload(&serde_json::json!({
        "valid": true,
        "states": config.state_count(),
        "presets": presets,
        "config": config,
    }))
}

/// Accept either one digit-string covering every dimension or one value
/// per dimension.
fn parse_state_args(args: &[String], arity: usize) -> Result<Vec<u8>> {
    let invalid = || {
        Error::Config(format!(
            "state must be {arity} digits (e.g. \"0101000\") or {arity} separate values"
        ))
    };

    if args.len() == 1 && args[0].len() == arity {
        return args[0]
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8).ok_or_else(invalid))
            .collect();
    }
    if args.len() == arity {
        return args
            .iter()
            .map(|a| a.parse::<u8>().map_err(|_| invalid()))
            .collect();
    }
    Err(invalid())
}

fn print_show_header(space: &StateSpace) {
    let columns: Vec<&str> = space.features().iter().map(|f| f.column()).collect();
    println!(" idx | {} | accept mfa reject", columns.join(" "));
}

fn print_show_row(idx: usize, state: &[u8], table: &QTable) {
    let digits: String = state.iter().map(|v| v.to_string()).collect();
    let row = table.row(idx);
    println!(
        "{idx:>4} | {digits} | {:>8.2} {:>8.2} {:>8.2}",
        row[0], row[1], row[2]
    );
}

fn print_payload(payload: &serde_json::Value) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(payload)
            .map_err(|e| Error::json(Path::new("<stdout>"), e))?
    );
    Ok(())
}
