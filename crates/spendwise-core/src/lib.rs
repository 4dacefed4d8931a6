//! Spendwise Core Library
//!
//! Shared functionality for the Spendwise expense tracker:
//! - Keyword categorizer with a fixed category priority order
//! - Categorization gateway (remote service with keyword fallback)
//! - Pluggable generative AI backends (Gemini, mock)
//! - Insight, budget recommendation and spending advice generation
//! - Prompt library for customizable AI prompts
//! - Layered configuration (embedded defaults, TOML override, environment)

pub mod ai;
pub mod categorize;
pub mod config;
pub mod error;
pub mod insights;
pub mod models;
pub mod prompts;

/// Test utilities including mock categorizer and Gemini servers
#[cfg(test)]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, GeminiBackend, GenerationConfig, MockBackend};
pub use categorize::{
    CategorizationGateway, CategorizerBackend, CategorizerClient, HttpCategorizer,
    KeywordCategorizer, MockCategorizer,
};
pub use config::{CategorizerConfig, Config, GeminiConfig};
pub use error::{Error, Result};
pub use insights::{Impact, Insight, InsightGateway, InsightType, PromptContext};
pub use models::{
    Budget, BulkCategorization, CategorizationResult, Category, CategoryTotal, ExpenseItem,
    ExpenseRecord, TrendPoint,
};
pub use prompts::{Prompt, PromptId, PromptLibrary};
