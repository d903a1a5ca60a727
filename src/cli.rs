use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// League standings service backed by a fast cache and a durable store.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// TOML configuration file; environment variables override its values
    #[arg(long, short, default_value = "standings.toml")]
    pub config: PathBuf,

    /// Log output format
    #[arg(long, value_enum, default_value_t = default_tracing_format())]
    pub tracing: TracingFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TracingFormat {
    /// Human-readable output for local development
    Pretty,
    /// Structured JSON lines for production
    Json,
}

fn default_tracing_format() -> TracingFormat {
    if cfg!(debug_assertions) {
        TracingFormat::Pretty
    } else {
        TracingFormat::Json
    }
}
