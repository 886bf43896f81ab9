use contech_agent::tools::{tool_catalog, ToolCatalog, ToolRegistry, ToolSummary};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct ToolsReport {
    registered: Vec<ToolSummary>,
    catalog: ToolCatalog,
}

pub fn run() -> CommandResult {
    let report =
        ToolsReport { registered: ToolRegistry::default().summaries(), catalog: tool_catalog() };
    CommandResult::json("tools", &report)
}
