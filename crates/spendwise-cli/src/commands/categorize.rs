//! Categorization command implementations

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use spendwise_core::{BulkCategorization, CategorizationGateway, Config, ExpenseItem};

use super::{load_expenses, to_items, truncate};

/// Categorize one expense via the service, falling back to keyword rules
pub async fn cmd_categorize(config: &Config, description: &str, merchant: Option<&str>) -> Result<()> {
    let description = description.trim();
    if description.is_empty() {
        anyhow::bail!("Description must not be empty");
    }

    let gateway = CategorizationGateway::from_config(&config.categorizer);
    let result = gateway.categorize_one(description, merchant).await;

    println!(
        "🏷️  {} → {} ({:.0}% confidence)",
        description,
        result.category,
        result.confidence * 100.0
    );
    Ok(())
}

/// Show local keyword suggestions without contacting the service
pub fn cmd_suggest(config: &Config, description: &str, merchant: Option<&str>) -> Result<()> {
    let gateway = CategorizationGateway::from_config(&config.categorizer);
    let suggestions = gateway.suggestions(description, merchant);

    if suggestions.is_empty() {
        println!("No keyword matches for \"{}\"", description);
        return Ok(());
    }

    println!("💡 Suggestions for \"{}\":", description);
    for (i, category) in suggestions.iter().enumerate() {
        println!("  {}. {}", i + 1, category);
    }
    Ok(())
}

/// Categorize every expense in a file with a single bulk request
pub async fn cmd_bulk(config: &Config, file: &Path) -> Result<()> {
    let expenses = load_expenses(file)?;
    let items = to_items(&expenses)?;
    if items.is_empty() {
        println!("No expenses with a description in {}", file.display());
        return Ok(());
    }

    println!("🔍 Categorizing {} expenses...\n", items.len());

    let gateway = CategorizationGateway::from_config(&config.categorizer);
    let rows = categorize_rows(&gateway, &items).await;

    println!(
        "{:<12} {:<40} {:<20} {:>5}",
        "ID", "Description", "Category", "Conf"
    );
    println!("{}", "-".repeat(80));
    for (item, result) in &rows {
        println!(
            "{:<12} {:<40} {:<20} {:>4.0}%",
            truncate(&result.id, 12),
            truncate(&item.description, 40),
            truncate(&result.category, 20),
            result.confidence * 100.0
        );
    }
    Ok(())
}

/// Bulk-categorize `items` and pair every result with its item by id, in input order
///
/// The service may answer in any order.
pub async fn categorize_rows<'a>(
    gateway: &CategorizationGateway,
    items: &'a [ExpenseItem],
) -> Vec<(&'a ExpenseItem, BulkCategorization)> {
    let mut by_id: HashMap<String, BulkCategorization> = gateway
        .categorize_bulk(items)
        .await
        .into_iter()
        .map(|result| (result.id.clone(), result))
        .collect();

    items
        .iter()
        .filter_map(|item| by_id.remove(&item.id).map(|result| (item, result)))
        .collect()
}
