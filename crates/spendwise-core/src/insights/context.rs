//! Prompt context built from caller-supplied records

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Budget, CategoryTotal, ExpenseRecord, TrendPoint};

/// Number of categories shown in prompts
pub const TOP_CATEGORIES: usize = 5;
/// Number of merchants shown in the insights prompt
pub const TOP_MERCHANTS: usize = 5;
/// Label for expenses without a merchant
pub const UNKNOWN_MERCHANT: &str = "Unknown";
/// Number of transactions shown in prompts
pub const RECENT_TRANSACTIONS: usize = 10;
/// Number of trend points shown in the advice prompt
const RECENT_TREND_POINTS: usize = 14;

/// Aggregated view of an expense list used to fill prompt templates
///
/// Built per request and dropped afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptContext {
    pub total: f64,
    pub count: usize,
    /// Per-category totals, largest first
    pub category_totals: Vec<CategoryTotal>,
    /// Per-merchant totals, largest first; missing merchants count as `Unknown`
    pub merchant_totals: Vec<MerchantTotal>,
    /// Most recent transactions, newest first
    pub recent: Vec<ExpenseRecord>,
}

impl PromptContext {
    pub fn from_expenses(expenses: &[ExpenseRecord]) -> Self {
        let mut recent: Vec<ExpenseRecord> = expenses.to_vec();
        // Undated records sort after dated ones; ties keep input order
        recent.sort_by(|a, b| match (a.date, b.date) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        recent.truncate(RECENT_TRANSACTIONS);

        Self {
            total: expenses.iter().map(|e| e.amount).sum(),
            count: expenses.len(),
            category_totals: category_totals(expenses),
            merchant_totals: merchant_totals(expenses),
            recent,
        }
    }

    /// The `n` largest categories
    pub fn top_categories(&self, n: usize) -> &[CategoryTotal] {
        &self.category_totals[..n.min(self.category_totals.len())]
    }

    /// The `n` merchants with the most spend
    pub fn top_merchants(&self, n: usize) -> &[MerchantTotal] {
        &self.merchant_totals[..n.min(self.merchant_totals.len())]
    }

    /// Template variables for the spending insights prompt
    pub fn insight_vars(&self) -> HashMap<&'static str, String> {
        let mut vars = self.base_vars();
        vars.insert(
            "top_merchants",
            self.top_merchants(TOP_MERCHANTS)
                .iter()
                .map(|m| format!("- {}: ${:.2}", m.merchant, m.total))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        vars.insert(
            "recent_transactions",
            self.recent
                .iter()
                .map(format_transaction)
                .collect::<Vec<_>>()
                .join("\n"),
        );
        vars
    }

    /// Template variables for the budget recommendations prompt
    pub fn recommendation_vars(&self, budgets: &[Budget]) -> HashMap<&'static str, String> {
        let mut vars = self.base_vars();
        vars.insert(
            "budgets",
            budgets
                .iter()
                .map(|b| {
                    format!(
                        "- {}: Budget ${:.2}, Spent ${:.2}, Remaining ${:.2}",
                        b.category,
                        b.amount,
                        b.spent,
                        b.remaining()
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        );
        vars
    }

    fn base_vars(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();
        vars.insert("total", format!("{:.2}", self.total));
        vars.insert("count", self.count.to_string());
        vars.insert(
            "top_categories",
            format_category_lines(self.top_categories(TOP_CATEGORIES)),
        );
        vars
    }
}

/// Aggregated spend for one merchant
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantTotal {
    pub merchant: String,
    pub total: f64,
}

/// Template variables for the spending advice prompt
pub fn advice_vars(breakdown: &[CategoryTotal], trends: &[TrendPoint]) -> HashMap<&'static str, String> {
    let mut sorted = breakdown.to_vec();
    sorted.sort_by(|a, b| b.total.total_cmp(&a.total));

    let skip = trends.len().saturating_sub(RECENT_TREND_POINTS);
    let trend_lines = trends[skip..]
        .iter()
        .map(|t| format!("- {}: ${:.2}", t.date, t.amount))
        .collect::<Vec<_>>()
        .join("\n");

    let mut vars = HashMap::new();
    vars.insert("category_breakdown", format_category_lines(&sorted));
    vars.insert("trends", trend_lines);
    vars
}

/// Sum amounts per category, largest first (ties by name)
pub fn category_totals(expenses: &[ExpenseRecord]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for expense in expenses {
        *totals.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }

    let mut totals: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// Sum amounts per merchant, largest first (ties by name)
pub fn merchant_totals(expenses: &[ExpenseRecord]) -> Vec<MerchantTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for expense in expenses {
        let merchant = expense
            .merchant
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_MERCHANT);
        *totals.entry(merchant).or_insert(0.0) += expense.amount;
    }

    let mut totals: Vec<MerchantTotal> = totals
        .into_iter()
        .map(|(merchant, total)| MerchantTotal {
            merchant: merchant.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    totals
}

fn format_category_lines(totals: &[CategoryTotal]) -> String {
    if totals.is_empty() {
        return "- (none)".to_string();
    }
    totals
        .iter()
        .map(|c| format!("- {}: ${:.2}", c.category, c.total))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_transaction(expense: &ExpenseRecord) -> String {
    let date = expense
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "undated".to_string());
    match &expense.merchant {
        Some(merchant) => format!(
            "- {} {} at {} ({}): ${:.2}",
            date, expense.description, merchant, expense.category, expense.amount
        ),
        None => format!(
            "- {} {} ({}): ${:.2}",
            date, expense.description, expense.category, expense.amount
        ),
    }
}
