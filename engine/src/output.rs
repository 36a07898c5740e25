//! Output formatting for responses and compiled grammars.

use docgram_core::{Bindings, OptionSpec, SlotKind, Value};
use serde::Serialize;

use crate::assemble::{Response, UsageParser};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// One declared name of a compiled grammar, as shown by `check`.
#[derive(Debug, Clone, Serialize)]
pub struct SlotReport {
    pub name: String,
    pub kind: &'static str,
    pub default: Value,
}

/// Summary of a compiled doc text.
#[derive(Debug, Clone, Serialize)]
pub struct GrammarReport {
    pub usage: String,
    pub formal_usage: String,
    pub pattern: String,
    pub options: Vec<OptionSpec>,
    pub slots: Vec<SlotReport>,
}

impl GrammarReport {
    pub fn from_parser(parser: &UsageParser) -> Self {
        let slots = parser
            .grammar()
            .slots
            .iter()
            .map(|slot| SlotReport {
                name: slot.name.clone(),
                kind: match slot.kind {
                    SlotKind::Option(_) => "option",
                    SlotKind::Argument => "argument",
                    SlotKind::Command => "command",
                },
                default: slot.default.clone(),
            })
            .collect();
        Self {
            usage: parser.usage().to_string(),
            formal_usage: parser.formal_usage().to_string(),
            pattern: parser.pattern().to_string(),
            options: parser.registry().iter().cloned().collect(),
            slots,
        }
    }
}

/// Formats one response in the requested output format.
pub fn format_response(response: &Response, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(response)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(response).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(response_to_table(response)),
    }
}

/// Formats only the bindings of a successful match.
pub fn format_bindings(bindings: &Bindings, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(bindings)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(bindings).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(bindings_to_table(bindings)),
    }
}

/// Formats several responses; JSON and YAML render a single array.
pub fn format_responses(responses: &[Response], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(responses)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(responses).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(responses
            .iter()
            .map(response_to_table)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Formats a grammar report in the requested output format.
pub fn format_report(report: &GrammarReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

fn response_to_table(response: &Response) -> String {
    if !response.success {
        let message = response.error_message.as_deref().unwrap_or("");
        return format!("error (status {}): {message}\n", response.error_status);
    }
    if let Some(ref output) = response.output {
        return format!("{output}\n");
    }

    bindings_to_table(&response.bindings)
}

fn bindings_to_table(bindings: &Bindings) -> String {
    let width = bindings.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, value) in bindings {
        out.push_str(&format!("{name:<width$}  {value}\n"));
    }
    out
}

fn report_to_table(report: &GrammarReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Formal usage: {}\n", report.formal_usage));
    out.push_str(&format!("Pattern:      {}\n", report.pattern));

    if !report.options.is_empty() {
        out.push_str(&format!("\nOptions ({}):\n", report.options.len()));
        for spec in &report.options {
            let default = spec
                .default
                .as_deref()
                .map(|d| format!("  [default: {d}]"))
                .unwrap_or_default();
            out.push_str(&format!("  {spec}{default}\n"));
        }
    }

    if !report.slots.is_empty() {
        out.push_str(&format!("\nBindings ({}):\n", report.slots.len()));
        let width = report.slots.iter().map(|s| s.name.len()).max().unwrap_or(0);
        for slot in &report.slots {
            out.push_str(&format!(
                "  {:<width$}  {:<8}  {}\n",
                slot.name, slot.kind, slot.default
            ));
        }
    }

    out
}
