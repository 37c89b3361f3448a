//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;
use crate::cli::args::{OutputFormat, TokenflowArgs};
use crate::error::Result;

/// Result structure for text analysis.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub field: String,
    pub analyzer: String,
    pub tokens: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
}

/// Names of the available analyzers.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzerList {
    pub analyzers: Vec<String>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &TokenflowArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
        OutputFormat::Csv => output_csv(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &TokenflowArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;

    match value.get("tokens") {
        Some(serde_json::Value::Array(tokens)) => {
            output_tokens_human(tokens, value.get("attributes"));
            Ok(())
        }
        _ => output_generic_human(&value, args),
    }
}

/// Output tokens in human format, one per line.
fn output_tokens_human(tokens: &[serde_json::Value], attributes: Option<&serde_json::Value>) {
    println!(
        "{:<6} {:<20} {:<12} {:<4} {:<10}",
        "POS", "TEXT", "OFFSETS", "INC", "TYPE"
    );
    for (i, token) in tokens.iter().enumerate() {
        let offsets = format!(
            "[{}, {})",
            format_value(&token["start_offset"]),
            format_value(&token["end_offset"])
        );
        println!(
            "{:<6} {:<20} {:<12} {:<4} {:<10}",
            format_value(&token["position"]),
            format_value(&token["text"]),
            offsets,
            format_value(&token["position_increment"]),
            format_value(&token["token_type"]),
        );
        if let Some(attrs) = attributes.and_then(|a| a.get(i)) {
            println!("       {}", format_value(attrs));
        }
    }
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value, _args: &TokenflowArgs) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &TokenflowArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Output in CSV format. Token lists become one row per token.
fn output_csv<T: Serialize>(result: &T, _args: &TokenflowArgs) -> Result<()> {
    let value = serde_json::to_value(result)?;

    let rows: Vec<&serde_json::Value> = match value.get("tokens").or_else(|| value.get("analyzers")) {
        Some(serde_json::Value::Array(items)) => items.iter().collect(),
        _ => vec![&value],
    };

    if let Some(serde_json::Value::Object(first)) = rows.first() {
        let headers: Vec<&str> = first.keys().map(String::as_str).collect();
        println!("{}", headers.join(","));
        for row in &rows {
            let cells: Vec<String> = headers
                .iter()
                .map(|header| format_csv_value(&row[*header]))
                .collect();
            println!("{}", cells.join(","));
        }
    } else {
        for row in rows {
            println!("{}", format_csv_value(row));
        }
    }
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}

/// Format a JSON value for CSV output.
fn format_csv_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => {
            if s.contains(',') || s.contains('"') || s.contains('\n') {
                let escaped = s.replace('"', "\"\"");
                format!("\"{escaped}\"")
            } else {
                s.clone()
            }
        }
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join("; ");
            format!("\"[{formatted_values}]\"")
        }
        serde_json::Value::Object(_) => "\"[object]\"".to_string(),
        serde_json::Value::Null => "".to_string(),
    }
}
