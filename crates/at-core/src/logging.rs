//! Structured logging setup.
//!
//! stdout is reserved for command payloads (JSON output); all log output
//! goes to stderr, either human-readable or as JSON lines for automation.
//! `AT_LOG`/`RUST_LOG` override the verbosity flags when set.

use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable console format.
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

/// Initialize the global tracing subscriber.
///
/// Verbosity: `-q` silences everything below warnings, each `-v` step
/// raises the default `info` level toward `trace`.
pub fn init_logging(verbose: u8, quiet: bool, format: LogFormat) {
    let default_level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_env("AT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Human => builder.init(),
        LogFormat::Jsonl => builder.json().init(),
    }
}
