use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Discrete two-level stochastic source.
#[derive(Parser)]
#[command(
    name = "ds-gen",
    version,
    about = "Discrete source simulator: switch-driven symbol generation and sequence probability"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Seed for a reproducible random stream (OS entropy if absent).
    #[arg(long, global = true, env = "DS_GEN_SEED")]
    pub seed: Option<u64>,

    /// Where the last loaded description is saved, and read back when
    /// `probability` runs without `--file`.
    #[arg(long, global = true, env = "DS_GEN_SNAPSHOT", default_value = "last_source.bin")]
    pub snapshot: PathBuf,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print generated symbols, one per line.
    Generate(GenerateArgs),
    /// Estimate how often a symbol sequence appears in a generated run.
    Probability(ProbabilityArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(clap::Args)]
pub struct GenerateArgs {
    /// Path to the JSON source description.
    #[arg(short, long)]
    pub file: PathBuf,

    /// Number of symbols; without it, generation runs until the quit key.
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// Key that stops live generation.
    #[arg(long, default_value_t = 'q')]
    pub quit_key: char,
}

/// Arguments for the `probability` subcommand.
#[derive(clap::Args)]
pub struct ProbabilityArgs {
    /// Path to the JSON source description (saved source if absent).
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Number of symbols to sample.
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: u64,

    /// Target symbol sequence.
    #[arg(short, long, num_args = 1.., required = true)]
    pub sequence: Vec<String>,
}
