//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use segue_extractor::{DetectionVariant, PairingStrategy};
use std::path::PathBuf;

/// Segue - Mine editorial transitions and build training triples.
#[derive(Debug, Parser)]
#[command(name = "segue")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SEGUE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable summary and preview (default)
    Text,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the unique transitions found in a document
    Transitions(TransitionsArgs),

    /// Build (paragraph, transition, paragraph) training triples
    Fewshots(FewshotsArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Arguments for the transitions command.
#[derive(Debug, Parser)]
pub struct TransitionsArgs {
    /// Document to read (.docx or plain text)
    pub file: PathBuf,

    /// Percentage of unique transitions to keep (1-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub percent: Option<u8>,

    /// Validate transitions with the configured oracle
    #[arg(long, conflicts_with = "no_oracle")]
    pub oracle: bool,

    /// Skip oracle validation even if the config enables it
    #[arg(long)]
    pub no_oracle: bool,

    /// Oracle model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the transition list to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the duplicate report to this file
    #[arg(long)]
    pub duplicates: Option<PathBuf>,
}

/// Arguments for the fewshots command.
#[derive(Debug, Parser)]
pub struct FewshotsArgs {
    /// Document to read (.docx or plain text)
    pub file: PathBuf,

    /// Transition detection variant
    #[arg(long, value_enum)]
    pub variant: Option<VariantArg>,

    /// Pairing strategy (defaults to the variant's own)
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Maximum triples per transition
    #[arg(long)]
    pub usage_cap: Option<usize>,

    /// Context similarity threshold (0.0-1.0]
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Stop after this many triples
    #[arg(long)]
    pub max_triples: Option<usize>,

    /// Truncate output to this many triples
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Validate triples with the configured oracle
    #[arg(long)]
    pub oracle: bool,

    /// Oracle model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Write few-shot examples as a JSON array
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write fine-tuning records as JSON lines
    #[arg(long)]
    pub jsonl: Option<PathBuf>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Detection variant argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum VariantArg {
    /// Transitions listed after a marker line
    MarkerBlock,
    /// Lines starting with a known opener phrase
    OpenerList,
    /// Short lines without sentence punctuation
    ShapeHeuristic,
}

/// Pairing strategy argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StrategyArg {
    /// Queue transitions, pair them with following bodies
    Buffered,
    /// Every (body, transition, body) window
    Sliding,
    /// Adjacent bodies under the last transition
    Grouped,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<VariantArg> for DetectionVariant {
    fn from(variant: VariantArg) -> Self {
        match variant {
            VariantArg::MarkerBlock => DetectionVariant::MarkerBlock,
            VariantArg::OpenerList => DetectionVariant::OpenerList,
            VariantArg::ShapeHeuristic => DetectionVariant::ShapeHeuristic,
        }
    }
}

impl From<StrategyArg> for PairingStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Buffered => PairingStrategy::Buffered,
            StrategyArg::Sliding => PairingStrategy::Sliding,
            StrategyArg::Grouped => PairingStrategy::Grouped,
        }
    }
}
