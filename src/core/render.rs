//! Renderer module
//!
//! Renders ResultSet to different output formats: text, jsonl, json, md

use chrono::DateTime;
use colored::Colorize;

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable list, one `- path` line per track
    #[default]
    Text,
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn format(&self) -> OutputFormat {
        self.config.format
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Text => self.render_text(result_set),
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
        }
    }

    fn render_text(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .map(|item| match item.kind {
                Kind::Track => format!("- {}", item.path.as_deref().unwrap_or_default())
                    .bright_red()
                    .to_string(),
                Kind::Skipped => format!(
                    "  skipped (vanished): {}",
                    item.path.as_deref().unwrap_or_default()
                )
                .yellow()
                .to_string(),
                Kind::Tool => item.excerpt.clone().unwrap_or_default(),
                Kind::Error => item
                    .errors
                    .iter()
                    .map(|e| format!("error {}: {}", e.code, e.message))
                    .collect::<Vec<_>>()
                    .join("\n"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut tracks = Vec::new();
        let mut skipped = Vec::new();
        let mut tools = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Track => tracks.push(item),
                Kind::Skipped => skipped.push(item),
                Kind::Tool => tools.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !tracks.is_empty() {
            output.push_str(&format!("## Selection ({})\n\n", tracks.len()));
            for item in tracks {
                render_track_md(&mut output, item);
            }
            output.push('\n');
        }

        if !skipped.is_empty() {
            output.push_str("## Skipped\n\n");
            for item in skipped {
                if let Some(path) = &item.path {
                    output.push_str(&format!("- `{}`\n", path));
                }
            }
            output.push('\n');
        }

        if !tools.is_empty() {
            output.push_str("## Tools\n\n");
            for item in tools {
                if let Some(excerpt) = &item.excerpt {
                    output.push_str(&format!("- {}\n", excerpt));
                }
            }
            output.push('\n');
        }

        output
    }
}

fn render_track_md(output: &mut String, item: &ResultItem) {
    let Some(path) = &item.path else {
        return;
    };

    output.push_str(&format!("- `{}`", path));
    if let Some(modified) = item.meta.mtime_ms.and_then(format_mtime) {
        output.push_str(&format!(" (modified {})", modified));
    }
    output.push('\n');
}

/// Format a millisecond timestamp as UTC `YYYY-MM-DD HH:MM:SS`
pub fn format_mtime(mtime_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(mtime_ms).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
