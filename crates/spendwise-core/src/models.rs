//! Data models for Spendwise

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Expense category labels
///
/// This is the closed label set known to the keyword categorizer. The remote
/// categorization service may answer with labels outside of it, which is why
/// `CategorizationResult::category` stays a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Bills & Utilities")]
    BillsAndUtilities,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Travel")]
    Travel,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Personal Care")]
    PersonalCare,
    #[serde(rename = "Gifts & Donations")]
    GiftsAndDonations,
    #[serde(rename = "Business")]
    Business,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodAndDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::BillsAndUtilities => "Bills & Utilities",
            Self::Healthcare => "Healthcare",
            Self::Travel => "Travel",
            Self::Education => "Education",
            Self::PersonalCare => "Personal Care",
            Self::GiftsAndDonations => "Gifts & Donations",
            Self::Business => "Business",
            Self::Other => "Other",
        }
    }

    /// Get all categories
    pub fn all() -> &'static [Category] {
        &[
            Self::FoodAndDining,
            Self::Transportation,
            Self::Shopping,
            Self::Entertainment,
            Self::BillsAndUtilities,
            Self::Healthcare,
            Self::Travel,
            Self::Education,
            Self::PersonalCare,
            Self::GiftsAndDonations,
            Self::Business,
            Self::Other,
        ]
    }

    /// Whether `label` is one of the known category labels (exact match)
    pub fn is_known(label: &str) -> bool {
        label.parse::<Category>().is_ok()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Result of categorizing a single expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizationResult {
    /// Category label (remote labels are passed through unvalidated)
    pub category: String,
    /// Confidence score; in [0,1] for keyword results, unchecked for remote ones
    pub confidence: f64,
}

impl CategorizationResult {
    pub fn new(category: Category, confidence: f64) -> Self {
        Self {
            category: category.as_str().to_string(),
            confidence,
        }
    }

    /// Parsed category, if the label belongs to the known set
    pub fn known_category(&self) -> Option<Category> {
        self.category.parse().ok()
    }

    /// Clamp this result to the known label set before persisting it
    ///
    /// Unknown labels become `Other` and the confidence is forced into [0,1]
    /// (NaN becomes 0).
    pub fn validated(&self) -> Self {
        let category = self.known_category().unwrap_or(Category::Other);
        let confidence = if self.confidence.is_nan() {
            0.0
        } else {
            self.confidence.clamp(0.0, 1.0)
        };
        Self::new(category, confidence)
    }
}

/// An expense submitted for bulk categorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
}

/// Bulk categorization output, keyed by the input item's id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkCategorization {
    pub id: String,
    pub category: String,
    pub confidence: f64,
}

/// An expense record as supplied by callers for insight generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

fn default_category() -> String {
    Category::Other.as_str().to_string()
}

/// A budget for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub category: String,
    pub amount: f64,
    /// Amount already spent in the budget period, as tracked by the caller
    #[serde(default)]
    pub spent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl Budget {
    pub fn remaining(&self) -> f64 {
        self.amount - self.spent
    }
}

/// Aggregated spend for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// One point of a daily spending trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub amount: f64,
}
