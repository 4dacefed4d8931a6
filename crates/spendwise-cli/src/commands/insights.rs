//! Insight, recommendation and advice command implementations

use std::path::Path;

use anyhow::Result;
use spendwise_core::insights::category_totals;
use spendwise_core::{Config, Insight, InsightGateway, InsightType};

use super::{daily_trends, load_budgets, load_expenses};

pub async fn cmd_insights(config: &Config, file: &Path) -> Result<()> {
    let expenses = load_expenses(file)?;
    let gateway = InsightGateway::from_config(config);

    println!("🔍 Analyzing {} expenses...\n", expenses.len());
    let insights = gateway.generate_insights(&expenses).await;
    for insight in &insights {
        print_insight(insight);
    }
    Ok(())
}

pub async fn cmd_recommend(config: &Config, file: &Path, budgets: Option<&Path>) -> Result<()> {
    let expenses = load_expenses(file)?;
    let budgets = match budgets {
        Some(path) => load_budgets(path)?,
        None => Vec::new(),
    };
    let gateway = InsightGateway::from_config(config);

    let recommendations = gateway
        .generate_budget_recommendations(&expenses, &budgets)
        .await;
    println!("📋 Budget recommendations:\n");
    print_numbered(&recommendations);
    Ok(())
}

/// Advice is derived from per-category totals and daily trends of the file
pub async fn cmd_advice(config: &Config, file: &Path) -> Result<()> {
    let expenses = load_expenses(file)?;
    let breakdown = category_totals(&expenses);
    let trends = daily_trends(&expenses);
    let gateway = InsightGateway::from_config(config);

    let advice = gateway.generate_spending_advice(&breakdown, &trends).await;
    println!("💬 Spending advice:\n");
    print_numbered(&advice);
    Ok(())
}

fn print_insight(insight: &Insight) {
    let icon = match insight.kind {
        InsightType::Warning => "⚠️ ",
        InsightType::Tip => "💡",
        InsightType::Achievement => "🏆",
        InsightType::Recommendation => "📌",
    };
    match &insight.category {
        Some(category) => println!("{} {} [{}]", icon, insight.title, category),
        None => println!("{} {}", icon, insight.title),
    }
    println!("   {}", insight.description);
    println!(
        "   impact: {}{}\n",
        insight.impact,
        if insight.actionable { ", actionable" } else { "" }
    );
}

fn print_numbered(lines: &[String]) {
    for (i, line) in lines.iter().enumerate() {
        println!("  {}. {}", i + 1, line);
    }
}
