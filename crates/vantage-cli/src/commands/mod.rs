//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Config resolution, snapshot loading, `config` command
//! - `reports` - Dashboard view rendering
//! - `drill` - Drill-down routes
//! - `ask` - Assistant session (one-shot and interactive)

pub mod ask;
pub mod core;
pub mod drill;
pub mod reports;

// Re-export command functions for main.rs
pub use ask::*;
pub use core::*;
pub use drill::*;
pub use reports::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
