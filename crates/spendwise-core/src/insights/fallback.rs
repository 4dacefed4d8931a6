//! Rule-based results used when the AI backend is unavailable
//!
//! Deterministic and free of I/O. Ids and timestamps are the only
//! non-deterministic parts of the output.

use crate::models::{Budget, CategoryTotal, ExpenseRecord, TrendPoint};

use super::context::category_totals;
use super::types::{Impact, Insight, InsightType};

/// Prefix of ids generated for fallback insights
pub const FALLBACK_PREFIX: &str = "fallback";

/// Total spend above which a warning is raised
pub const HIGH_SPENDING_THRESHOLD: f64 = 1000.0;
/// Amount below which a purchase counts as small
pub const SMALL_PURCHASE_AMOUNT: f64 = 10.0;
/// Share of small purchases above which a tip is raised
pub const SMALL_PURCHASE_SHARE: f64 = 0.3;

/// Upper bound on recommendation and advice lists
pub const MAX_ITEMS: usize = 5;

/// Number of categories examined by budget rules
const BUDGET_TOP_CATEGORIES: usize = 3;
/// Trend points needed before a daily average is cited
const WEEK: usize = 7;

pub fn insights(expenses: &[ExpenseRecord]) -> Vec<Insight> {
    if expenses.is_empty() {
        return vec![Insight::new(
            FALLBACK_PREFIX,
            InsightType::Tip,
            "Start Tracking Your Expenses",
            "Add your daily expenses to get personalized insights about your spending.",
            Impact::Low,
        )];
    }

    let mut insights = Vec::new();

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    if total > HIGH_SPENDING_THRESHOLD {
        insights.push(Insight::new(
            FALLBACK_PREFIX,
            InsightType::Warning,
            "High Spending Detected",
            format!(
                "You've spent ${:.2} recently. Consider reviewing your largest expenses.",
                total
            ),
            Impact::High,
        ));
    }

    let small = expenses
        .iter()
        .filter(|e| e.amount < SMALL_PURCHASE_AMOUNT)
        .count();
    if small as f64 > expenses.len() as f64 * SMALL_PURCHASE_SHARE {
        insights.push(Insight::new(
            FALLBACK_PREFIX,
            InsightType::Tip,
            "Many Small Purchases",
            format!(
                "{} of your {} purchases were under ${:.0}. Small purchases add up quickly, so keep an eye on coffee and snacks.",
                small,
                expenses.len(),
                SMALL_PURCHASE_AMOUNT
            ),
            Impact::Medium,
        ));
    }

    insights
}

pub fn budget_recommendations(expenses: &[ExpenseRecord], budgets: &[Budget]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if budgets.is_empty() {
        recommendations
            .push("Start by setting budgets for your top 3 spending categories".to_string());
    }

    for top in category_totals(expenses)
        .iter()
        .take(BUDGET_TOP_CATEGORIES)
    {
        match budgets.iter().find(|b| b.category == top.category) {
            None => recommendations.push(format!(
                "Consider setting a budget for {}: you've spent ${:.2} there",
                top.category, top.total
            )),
            Some(budget) if top.total > budget.amount => recommendations.push(format!(
                "You're ${:.2} over budget for {}. Consider reducing spending in this category.",
                top.total - budget.amount,
                top.category
            )),
            Some(_) => {}
        }
    }

    recommendations.truncate(MAX_ITEMS);
    recommendations
}

pub fn spending_advice(breakdown: &[CategoryTotal], trends: &[TrendPoint]) -> Vec<String> {
    let mut advice = Vec::new();

    if let Some(top) = breakdown
        .iter()
        .max_by(|a, b| a.total.total_cmp(&b.total))
    {
        advice.push(format!(
            "Your highest spending category is {} (${:.2}). Look for ways to cut back there first.",
            top.category, top.total
        ));
    }

    if trends.len() > WEEK {
        let last_week = &trends[trends.len() - WEEK..];
        let average = last_week.iter().map(|t| t.amount).sum::<f64>() / WEEK as f64;
        advice.push(format!(
            "You've averaged ${:.2} per day over the last week. Try to keep daily spending under ${:.2}.",
            average, average
        ));
    }

    advice.extend(
        [
            "Set up an automatic transfer to savings right after each payday",
            "Review and cancel subscriptions you no longer use",
            "Use the 24-hour rule for non-essential purchases over $50",
        ]
        .map(String::from),
    );

    advice.truncate(MAX_ITEMS);
    advice
}
