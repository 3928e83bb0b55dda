//! Doctor - external tool checking

use anyhow::Result;

use crate::core::model::{PickError, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::command_exists;

/// Availability of one external tool
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub name: String,
    pub available: bool,
    /// Command that needs the tool
    pub used_by: &'static str,
    pub notes: Option<String>,
}

impl ToolStatus {
    fn check(name: &str, used_by: &'static str, notes: &str) -> Self {
        Self {
            name: name.to_string(),
            available: command_exists(name),
            used_by,
            notes: Some(notes.to_string()),
        }
    }

    pub fn to_result_item(&self) -> ResultItem {
        let status = if self.available { "✓" } else { "✗" };
        let found = if self.available { "found" } else { "not found" };

        let mut excerpt = format!(
            "{} {} (needed by {}) - {}",
            status, self.name, self.used_by, found
        );
        if let Some(notes) = &self.notes {
            excerpt.push_str(&format!("\n  Note: {}", notes));
        }

        let item = ResultItem::tool(excerpt);
        if self.available {
            item
        } else {
            item.with_error(PickError::new(
                "MISSING_TOOL",
                format!("{} is needed by '{}' but was not found", self.name, self.used_by),
            ))
        }
    }
}

/// Check the configured player and fetcher
pub fn check_tools(player: &str, fetcher: &str) -> Vec<ToolStatus> {
    vec![
        ToolStatus::check(
            player,
            "play",
            "Set another player with --player or TUNEPICK_PLAYER",
        ),
        ToolStatus::check(
            fetcher,
            "install",
            "Set another fetcher with --fetcher or TUNEPICK_FETCHER",
        ),
    ]
}

/// Run the doctor command
pub fn run_doctor(player: &str, fetcher: &str, config: RenderConfig) -> Result<()> {
    let tools = check_tools(player, fetcher);

    let result_set: ResultSet = tools.iter().map(ToolStatus::to_result_item).collect();

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    if tools.iter().any(|t| !t.available) {
        tracing::warn!("some external tools are missing");
    }

    Ok(())
}
