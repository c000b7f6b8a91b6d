use multistat_core::error::Result;
use multistat_core::graph::GraphRegistry;

pub const DEFINITIONS_HEADER: &str = "# mackerel-agent-plugin";

pub fn render_definitions(registry: &GraphRegistry) -> Result<String> {
    Ok(format!("{DEFINITIONS_HEADER}\n{}\n", registry.to_json()?))
}
