//! Server command implementation

use anyhow::Result;
use spendwise_core::Config;

pub async fn cmd_serve(config: Config, host: &str, port: u16) -> Result<()> {
    println!("🚀 Starting Spendwise web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Categorizer: {}", config.categorizer.base_url);
    if config.has_ai_credential() {
        println!("   AI model: {}", config.gemini.model);
    } else {
        println!("   ⚠️  GEMINI_API_KEY not set, insights use rule-based fallback");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    spendwise_server::serve(config, host, port).await
}
