//! Plugin protocol output for the monitoring agent.
//!
//! Two modes, selected by the agent through the environment:
//! - definitions: `# mackerel-agent-plugin` header plus graph JSON.
//! - values: `<key>\t<value>\t<unix_secs>` lines for one poll cycle.
//!
//! Diffed counters need the previous cycle's raw values, kept in the
//! state file between runs.

pub mod definitions;
pub mod state;
pub mod values;

pub use definitions::render_definitions;
pub use state::CounterState;
pub use values::render_values;

/// Set by the agent when it asks for graph definitions instead of values.
pub const META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

pub fn meta_requested() -> bool {
    std::env::var(META_ENV).is_ok_and(|v| !v.is_empty())
}
