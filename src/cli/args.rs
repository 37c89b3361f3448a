//! Command line argument parsing for Tokenflow CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Tokenflow - run text through analysis pipelines
#[derive(Parser, Debug, Clone)]
#[command(name = "tokenflow")]
#[command(about = "Run text through tokenizer and token filter pipelines")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TokenflowArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TokenflowArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze text and print the resulting tokens
    Analyze(AnalyzeArgs),

    /// List the built-in analyzers
    #[command(name = "list-analyzers")]
    ListAnalyzers,
}

/// Arguments for analyzing text
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Text to analyze
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Analyzer name (built-in, or defined in the config file)
    #[arg(short, long)]
    pub analyzer: Option<String>,

    /// Analysis configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Field name used for per-field analyzer dispatch
    #[arg(long, default_value = "body")]
    pub field: String,

    /// Drop duplicate tokens stacked on one position
    #[arg(long)]
    pub dedup: bool,

    /// Include every attribute of each token
    #[arg(long)]
    pub attributes: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
    /// CSV output (tokens only)
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_analyze_command() {
        let args = TokenflowArgs::try_parse_from([
            "tokenflow",
            "analyze",
            "我是中国人",
            "--analyzer",
            "smart_chinese",
            "--field",
            "title",
            "--dedup",
        ])
        .unwrap();

        if let Command::Analyze(analyze_args) = args.command {
            assert_eq!(analyze_args.text, "我是中国人");
            assert_eq!(analyze_args.analyzer.as_deref(), Some("smart_chinese"));
            assert_eq!(analyze_args.field, "title");
            assert!(analyze_args.dedup);
            assert!(!analyze_args.attributes);
            assert!(analyze_args.config.is_none());
        } else {
            panic!("Expected Analyze command");
        }
    }

    #[test]
    fn test_analyze_defaults() {
        let args = TokenflowArgs::try_parse_from([
            "tokenflow",
            "analyze",
            "text",
            "--config",
            "analysis.json",
        ])
        .unwrap();

        if let Command::Analyze(analyze_args) = args.command {
            assert_eq!(analyze_args.field, "body");
            assert_eq!(analyze_args.config, Some(PathBuf::from("analysis.json")));
            assert!(analyze_args.analyzer.is_none());
        } else {
            panic!("Expected Analyze command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = TokenflowArgs::try_parse_from(["tokenflow", "list-analyzers"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = TokenflowArgs::try_parse_from(["tokenflow", "-vv", "list-analyzers"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        // Quiet flag
        let args =
            TokenflowArgs::try_parse_from(["tokenflow", "--quiet", "list-analyzers"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            TokenflowArgs::try_parse_from(["tokenflow", "--format", "json", "list-analyzers"])
                .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
