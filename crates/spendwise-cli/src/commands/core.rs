//! Shared utilities for commands
//!
//! This module contains:
//! - `load_config` - Resolve configuration from `--config`, the data dir and the environment
//! - `load_expenses` / `load_budgets` - Read JSON or CSV input files
//! - `daily_trends` - Sum dated expenses per day

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::debug;

use spendwise_core::{Budget, Category, Config, ExpenseItem, ExpenseRecord, TrendPoint};

/// Load configuration from an explicit path, or the default location
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found: {}", p.display());
            }
            Config::load_from(p).with_context(|| format!("Failed to load {}", p.display()))?
        }
        None => Config::load().context("Failed to load configuration")?,
    };
    debug!(
        categorizer = %config.categorizer.base_url,
        model = %config.gemini.model,
        ai = config.has_ai_credential(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Read expense records from a JSON array or a CSV file
///
/// CSV files use the headers `id,description,merchant,category,amount,date`;
/// every column except `description` may be omitted or left blank.
pub fn load_expenses(path: &Path) -> Result<Vec<ExpenseRecord>> {
    let records: Vec<ExpenseRecord> = read_records(path)?;
    let expenses: Vec<ExpenseRecord> = records.into_iter().map(normalize_expense).collect();
    debug!(count = expenses.len(), file = %path.display(), "Loaded expenses");
    Ok(expenses)
}

/// Read budgets from a JSON array or a CSV file (`category,amount,spent,period`)
///
/// In CSV files `spent` must be numeric when the column is present.
pub fn load_budgets(path: &Path) -> Result<Vec<Budget>> {
    let budgets: Vec<Budget> = read_records(path)?;
    Ok(budgets
        .into_iter()
        .filter(|b| !b.category.trim().is_empty())
        .collect())
}

/// Convert expense records to categorization items, keyed by id or position
///
/// Fails when two items end up with the same id, including a positional id
/// that collides with an explicit one.
pub fn to_items(expenses: &[ExpenseRecord]) -> Result<Vec<ExpenseItem>> {
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(expenses.len());
    for (index, expense) in expenses.iter().enumerate() {
        if expense.description.is_empty() {
            continue;
        }
        let id = expense.id.clone().unwrap_or_else(|| index.to_string());
        if !seen.insert(id.clone()) {
            anyhow::bail!("Duplicate expense id {} (row {})", id, index + 1);
        }
        items.push(ExpenseItem {
            id,
            description: expense.description.clone(),
            merchant: expense.merchant.clone(),
        });
    }
    Ok(items)
}

/// Daily spending totals, oldest first. Undated expenses are skipped.
pub fn daily_trends(expenses: &[ExpenseRecord]) -> Vec<TrendPoint> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for expense in expenses {
        if let Some(date) = expense.date {
            *by_day.entry(date).or_insert(0.0) += expense.amount;
        }
    }
    by_day
        .into_iter()
        .map(|(date, amount)| TrendPoint { date, amount })
        .collect()
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    if is_json(path, &content) {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))
    } else {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        reader
            .deserialize()
            .enumerate()
            .map(|(i, row)| {
                // Header is line 1
                row.with_context(|| format!("Invalid CSV row {} in {}", i + 2, path.display()))
            })
            .collect()
    }
}

fn is_json(path: &Path, content: &str) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => true,
        Some(ext) if ext.eq_ignore_ascii_case("csv") => false,
        _ => content.trim_start().starts_with('['),
    }
}

fn normalize_expense(mut expense: ExpenseRecord) -> ExpenseRecord {
    expense.description = expense.description.trim().to_string();
    expense.id = expense.id.filter(|id| !id.trim().is_empty());
    expense.merchant = expense.merchant.filter(|m| !m.trim().is_empty());
    if expense.category.trim().is_empty() {
        expense.category = Category::Other.as_str().to_string();
    }
    expense
}
