//! Clap command-line types for the `tubesim` binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tubesim",
    version,
    about = "Five-card-draw tube-economy simulator"
)]
pub struct TubesimCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a simulation and emit the economic report
    Sim {
        /// Number of rounds to simulate
        #[arg(long, default_value_t = 20_000)]
        rounds: u64,
        /// Players at the table (dealer excluded)
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=4))]
        players: u8,
        /// Ante per participant per round
        #[arg(long, default_value_t = 5)]
        ante: u64,
        /// Base RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Hold strategy: rulebook or pat
        #[arg(long, default_value = "rulebook")]
        strategy: String,
        /// Append per-round history to this JSONL file
        #[arg(long)]
        output: Option<String>,
        /// Write the JSON report here instead of stdout
        #[arg(long)]
        report: Option<String>,
        /// Print a progress line every N rounds
        #[arg(long)]
        progress: Option<u64>,
    },
    /// Run one simulation per seed, each on its own thread
    Sweep {
        /// Comma-separated seed list, e.g. 1,2,42
        #[arg(long)]
        seeds: String,
        #[arg(long, default_value_t = 5_000)]
        rounds: u64,
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=4))]
        players: u8,
        #[arg(long, default_value_t = 5)]
        ante: u64,
        #[arg(long, default_value = "rulebook")]
        strategy: String,
    },
    /// Aggregate statistics from round-history JSONL files
    Stats {
        /// JSONL file (.jsonl or .jsonl.zst) or directory of them
        #[arg(long)]
        input: String,
    },
    /// Deal one hand and show its hold decision
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "rulebook")]
        strategy: String,
    },
    /// Show resolved configuration defaults and their sources
    Cfg,
}
