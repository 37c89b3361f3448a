//! Command implementations for Tokenflow CLI.

use std::sync::Arc;

use log::info;

use crate::analysis::analyzer::{Analyzer, BUILTIN_ANALYZERS, builtin_analyzer};
use crate::analysis::attribute::PositionIncrementAttribute;
use crate::analysis::stream::AnalyzedStream;
use crate::analysis::token::PositionTracker;
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::remove_duplicates::RemoveDuplicatesFilter;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::AnalysisConfig;
use crate::error::Result;

/// Execute a CLI command.
pub fn execute_command(args: TokenflowArgs) -> Result<()> {
    match &args.command {
        Command::Analyze(analyze_args) => analyze_text(analyze_args, &args),
        Command::ListAnalyzers => list_analyzers(&args),
    }
}

/// Analyze text and print the tokens.
fn analyze_text(args: &AnalyzeArgs, cli_args: &TokenflowArgs) -> Result<()> {
    let result = run_analysis(args)?;
    let message = format!(
        "Analyzed field '{}' with '{}': {} tokens",
        result.field,
        result.analyzer,
        result.tokens.len()
    );
    output_result(&message, &result, cli_args)
}

/// List the built-in analyzers.
fn list_analyzers(cli_args: &TokenflowArgs) -> Result<()> {
    let result = AnalyzerList {
        analyzers: BUILTIN_ANALYZERS.iter().map(|name| name.to_string()).collect(),
    };
    output_result("Built-in analyzers:", &result, cli_args)
}

/// Pick the analyzer named by the arguments.
pub fn resolve_analyzer(args: &AnalyzeArgs) -> Result<Arc<dyn Analyzer>> {
    match (&args.config, &args.analyzer) {
        (Some(path), name) => {
            info!("Loading analysis config from {}", path.display());
            let config = AnalysisConfig::from_file(path)?;
            match name {
                Some(name) => config.resolve(name),
                None => Ok(Arc::new(config.build()?)),
            }
        }
        (None, Some(name)) => builtin_analyzer(name),
        (None, None) => builtin_analyzer("standard"),
    }
}

/// Run the analysis described by `args` without printing anything.
pub fn run_analysis(args: &AnalyzeArgs) -> Result<AnalysisResult> {
    let analyzer = resolve_analyzer(args)?;

    let mut stream = analyzer.build_stream(&args.field, &args.text)?;
    if args.dedup {
        stream = RemoveDuplicatesFilter::new().filter(stream)?;
    }
    let stream = AnalyzedStream::new(args.field.as_str(), stream);

    let increment = stream.add_attribute::<PositionIncrementAttribute>();
    let mut tracker = PositionTracker::new();
    let mut tokens = Vec::new();
    let mut attributes = Vec::new();
    stream.consume(|current| {
        let mut token = current.snapshot();
        token.position = tracker.advance(increment.borrow().increment());
        tokens.push(token);
        if args.attributes {
            attributes.push(current.reflect_as_string(true));
        }
        Ok(())
    })?;

    Ok(AnalysisResult {
        field: args.field.clone(),
        analyzer: analyzer.name().to_string(),
        tokens,
        attributes: args.attributes.then_some(attributes),
    })
}
