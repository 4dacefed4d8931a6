//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config loading, expense and budget files)
//! - `categorize` - Single, bulk and suggestion categorization
//! - `insights` - Insights, budget recommendations and spending advice
//! - `ping` - Backend connectivity check
//! - `serve` - Web server command

pub mod categorize;
pub mod core;
pub mod insights;
pub mod ping;
pub mod serve;

// Re-export command functions for main.rs
pub use categorize::*;
pub use core::*;
pub use insights::*;
pub use ping::*;
pub use serve::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
