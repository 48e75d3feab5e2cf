//! Output formatting for CLI

use console::style;
use serde::Serialize;
use tabled::Tabled;

/// Output format options
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Result of resolving and attaching one source
#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub source: String,
    pub mime_hint: Option<String>,
    pub source_handler: String,
    pub stream_type: String,
    pub stream_url: String,
    pub stream_handler: String,
    pub surface_src: Option<String>,
}

/// One registry entry
#[derive(Debug, Serialize, Tabled)]
pub struct HandlerRow {
    #[tabled(rename = "Priority")]
    pub priority: usize,
    #[tabled(rename = "Registry")]
    pub registry: &'static str,
    #[tabled(rename = "Handler")]
    pub name: String,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

pub fn print_resolve_report(report: &ResolveReport) {
    println!("{} {}", style("Source:").bold(), report.source);
    if let Some(mime) = &report.mime_hint {
        println!("  MIME hint:      {}", mime);
    }
    println!("  Source handler: {}", style(&report.source_handler).cyan());
    println!(
        "  Descriptor:     {} {}",
        style(&report.stream_type).yellow(),
        report.stream_url
    );
    println!("  Stream handler: {}", style(&report.stream_handler).green());
    if let Some(src) = &report.surface_src {
        println!("  Surface src:    {}", src);
    }
}
