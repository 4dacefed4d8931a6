//! Prompt library for the generative insight gateways
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/spendwise/prompts/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Users can reword prompts without rebuilding, and still pick up new
//! default prompts on upgrade.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const SPENDING_INSIGHTS: &str = include_str!("../../../prompts/spending_insights.md");
    pub const BUDGET_RECOMMENDATIONS: &str =
        include_str!("../../../prompts/budget_recommendations.md");
    pub const SPENDING_ADVICE: &str = include_str!("../../../prompts/spending_advice.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    SpendingInsights,
    BudgetRecommendations,
    SpendingAdvice,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpendingInsights => "spending_insights",
            Self::BudgetRecommendations => "budget_recommendations",
            Self::SpendingAdvice => "spending_advice",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[
            Self::SpendingInsights,
            Self::BudgetRecommendations,
            Self::SpendingAdvice,
        ]
    }

    /// Get the default embedded content for this prompt
    fn default_content(&self) -> &'static str {
        match self {
            Self::SpendingInsights => defaults::SPENDING_INSIGHTS,
            Self::BudgetRecommendations => defaults::BUDGET_RECOMMENDATIONS,
            Self::SpendingAdvice => defaults::SPENDING_ADVICE,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    /// Unique identifier
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Metadata from frontmatter
    pub metadata: PromptMetadata,
    /// The prompt template
    pub content: String,
    /// Whether this came from an override file
    pub is_override: bool,
    /// Path to override file (if any)
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    /// Render the prompt with template variables replaced
    ///
    /// Conditionals are resolved on the template alone, then `{{var}}`
    /// placeholders are filled in one pass. Substituted values are never
    /// scanned again, so braces inside expense data come through verbatim.
    pub fn render(&self, vars: &HashMap<&str, String>) -> String {
        let template = resolve_conditionals(&self.content, vars);
        substitute(&template, vars)
    }
}

/// Prompt library for loading prompts
///
/// Loads from disk on every `get`, so edits to override files apply to the
/// next request without a restart.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    /// Override directory path
    override_dir: Option<PathBuf>,
}

impl PromptLibrary {
    /// Create a new prompt library with default paths
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
        }
    }

    /// Create a prompt library with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self { override_dir: None }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&self, id: PromptId) -> Result<Prompt> {
        if let Some(override_path) = self.override_path(id) {
            let content = fs::read_to_string(&override_path).map_err(|e| {
                Error::InvalidData(format!("Failed to read prompt override: {}", e))
            })?;
            let (metadata, body) = parse_prompt(&content)?;
            return Ok(Prompt {
                metadata,
                content: body,
                is_override: true,
                override_path: Some(override_path),
            });
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        })
    }

    /// Render a prompt, falling back to the embedded default if an override
    /// cannot be loaded
    pub fn render(&self, id: PromptId, vars: &HashMap<&str, String>) -> Result<String> {
        let prompt = match self.get(id) {
            Ok(prompt) => prompt,
            Err(e) if self.has_override(id) => {
                tracing::warn!(prompt = id.as_str(), error = %e, "Ignoring broken prompt override");
                Self::embedded_only().get(id)?
            }
            Err(e) => return Err(e),
        };
        Ok(prompt.render(vars))
    }

    /// Check if a prompt has an override file
    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_path(id).is_some()
    }

    fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        let path = self
            .override_dir
            .as_ref()?
            .join(format!("{}.md", id.as_str()));
        path.exists().then_some(path)
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendwise").join("prompts"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    let rest = content.strip_prefix("---").ok_or_else(|| {
        Error::InvalidData("Prompt must start with YAML frontmatter (---)".into())
    })?;

    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Keep `{{#if var}}` blocks whose variable is set and non-empty, drop the rest
/// Replace `{{var}}` placeholders left to right; unknown names stay as written
fn substitute(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match vars.get(name.trim()) {
            Some(value) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn resolve_conditionals(content: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = content.to_string();

    while let Some(if_start) = result.find("{{#if ") {
        let var_start = if_start + 6;
        let Some(var_end) = result[var_start..].find("}}") else {
            break;
        };
        let var_name = result[var_start..var_start + var_end].trim();
        let block_start = var_start + var_end + 2;

        let Some(endif_pos) = result[block_start..].find("{{/if}}") else {
            break;
        };
        let block_content = &result[block_start..block_start + endif_pos];
        let full_end = block_start + endif_pos + 7;

        let keep = vars.get(var_name).is_some_and(|v| !v.trim().is_empty());
        result = if keep {
            format!(
                "{}{}{}",
                &result[..if_start],
                block_content,
                &result[full_end..]
            )
        } else {
            format!("{}{}", &result[..if_start], &result[full_end..])
        };
    }

    result
}
