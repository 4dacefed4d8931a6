//! Insight types

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    #[default]
    Tip,
    Warning,
    Achievement,
    Recommendation,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tip => "tip",
            Self::Warning => "warning",
            Self::Achievement => "achievement",
            Self::Recommendation => "recommendation",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tip" => Ok(Self::Tip),
            "warning" => Ok(Self::Warning),
            "achievement" => Ok(Self::Achievement),
            "recommendation" => Ok(Self::Recommendation),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// How much an insight matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    #[default]
    Medium,
    High,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Impact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown impact: {}", s)),
        }
    }
}

/// A generated financial insight
///
/// Ephemeral: produced on demand and never stored by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub impact: Impact,
    pub actionable: bool,
    pub created_at: DateTime<Utc>,
}

impl Insight {
    /// Build an actionable insight stamped with a fresh id and the current time
    pub fn new(
        prefix: &str,
        kind: InsightType,
        title: impl Into<String>,
        description: impl Into<String>,
        impact: Impact,
    ) -> Self {
        Self {
            id: next_insight_id(prefix),
            kind,
            title: title.into(),
            description: description.into(),
            category: None,
            impact,
            actionable: true,
            created_at: Utc::now(),
        }
    }
}

static INSIGHT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Process-unique id: `{prefix}-{unix millis}-{sequence}`
pub fn next_insight_id(prefix: &str) -> String {
    let seq = INSIGHT_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), seq)
}
