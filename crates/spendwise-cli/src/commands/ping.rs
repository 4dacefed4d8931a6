//! Connectivity check command

use anyhow::Result;
use spendwise_core::{AIBackend, CategorizationGateway, CategorizerBackend, Config, InsightGateway};

pub async fn cmd_ping(config: &Config) -> Result<()> {
    let categorizer = CategorizationGateway::from_config(&config.categorizer);
    let insights = InsightGateway::from_config(config);

    let (categorizer_ok, ai_ok) = tokio::join!(categorizer.ping(), insights.ping());

    println!("Checking backends...\n");
    if categorizer_ok {
        println!(
            "  ✅ Categorization service: {}",
            categorizer.backend().host()
        );
    } else {
        println!(
            "  ❌ Categorization service: {} (keyword fallback will be used)",
            categorizer.backend().host()
        );
    }

    let ai = insights.ai();
    if !ai.is_configured() {
        println!("  ⚠️  AI backend: not configured (set GEMINI_API_KEY)");
    } else if ai_ok {
        println!("  ✅ AI backend: {} (model: {})", ai.host(), ai.model());
    } else {
        println!(
            "  ❌ AI backend: {} (model: {}) not responding",
            ai.host(),
            ai.model()
        );
    }
    Ok(())
}
