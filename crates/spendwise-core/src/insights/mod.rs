//! AI-generated spending insights, budget recommendations and advice
//!
//! Every operation follows the same call-or-fallback skeleton:
//!
//! 1. No credential: skip the backend entirely and use the rule-based result
//! 2. Render the prompt and make exactly one backend call (no retries)
//! 3. Parse the free-form answer; any failure falls back to the rules
//!
//! Errors are logged and never reach the caller.

mod context;
pub mod fallback;
mod types;

pub use context::{
    advice_vars, category_totals, merchant_totals, MerchantTotal, PromptContext,
    RECENT_TRANSACTIONS, TOP_CATEGORIES, TOP_MERCHANTS,
};
pub use types::{next_insight_id, Impact, Insight, InsightType};

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::ai::parsing::{parse_insights, parse_string_list};
use crate::ai::{AIBackend, AIClient, MockBackend};
use crate::config::Config;
use crate::models::{Budget, CategoryTotal, ExpenseRecord, TrendPoint};
use crate::prompts::{PromptId, PromptLibrary};

use fallback::MAX_ITEMS;

/// Generative insight gateway over an AI backend
#[derive(Clone)]
pub struct InsightGateway {
    ai: AIClient,
    prompts: PromptLibrary,
}

impl InsightGateway {
    pub fn new(ai: AIClient) -> Self {
        Self {
            ai,
            prompts: PromptLibrary::new(),
        }
    }

    /// Gateway over the Gemini backend described by `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(AIClient::from_config(config))
    }

    /// Gateway over a mock backend, using embedded prompts only
    pub fn mock(mock: MockBackend) -> Self {
        Self::new(AIClient::Mock(mock)).with_prompts(PromptLibrary::embedded_only())
    }

    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn ai(&self) -> &AIClient {
        &self.ai
    }

    /// Generate 3-5 insights about an expense list
    ///
    /// An empty list always yields the single "start tracking" tip without a
    /// backend call.
    pub async fn generate_insights(&self, expenses: &[ExpenseRecord]) -> Vec<Insight> {
        if expenses.is_empty() {
            return fallback::insights(expenses);
        }

        let vars = PromptContext::from_expenses(expenses).insight_vars();
        let Some(text) = self.call(PromptId::SpendingInsights, &vars).await else {
            return fallback::insights(expenses);
        };

        match parse_insights(&text, Utc::now()) {
            Ok(insights) => insights,
            Err(e) => {
                warn!(error = %e, "Could not parse AI insights, using fallback");
                fallback::insights(expenses)
            }
        }
    }

    /// Suggest up to five budget changes
    pub async fn generate_budget_recommendations(
        &self,
        expenses: &[ExpenseRecord],
        budgets: &[Budget],
    ) -> Vec<String> {
        let vars = PromptContext::from_expenses(expenses).recommendation_vars(budgets);
        self.string_list(PromptId::BudgetRecommendations, &vars)
            .await
            .unwrap_or_else(|| fallback::budget_recommendations(expenses, budgets))
    }

    /// Give up to five pieces of spending advice
    pub async fn generate_spending_advice(
        &self,
        breakdown: &[CategoryTotal],
        trends: &[TrendPoint],
    ) -> Vec<String> {
        let vars = advice_vars(breakdown, trends);
        self.string_list(PromptId::SpendingAdvice, &vars)
            .await
            .unwrap_or_else(|| fallback::spending_advice(breakdown, trends))
    }

    /// Liveness probe for the AI backend; never fails
    ///
    /// Returns false without any I/O when no credential is configured.
    pub async fn ping(&self) -> bool {
        if !self.ai.is_configured() {
            return false;
        }
        self.ai.health_check().await
    }

    /// Backend answer parsed as a string list; `None` means use the fallback
    async fn string_list(
        &self,
        id: PromptId,
        vars: &HashMap<&'static str, String>,
    ) -> Option<Vec<String>> {
        let text = self.call(id, vars).await?;
        let items = parse_string_list(&text, MAX_ITEMS);
        if items.is_empty() {
            warn!(prompt = id.as_str(), "AI response had no usable entries, using fallback");
            return None;
        }
        Some(items)
    }

    /// One backend call; `None` means use the fallback
    async fn call(&self, id: PromptId, vars: &HashMap<&'static str, String>) -> Option<String> {
        if !self.ai.is_configured() {
            warn!(
                prompt = id.as_str(),
                "AI backend not configured (GEMINI_API_KEY), using fallback"
            );
            return None;
        }

        let prompt = match self.prompts.render(id, vars) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(prompt = id.as_str(), error = %e, "Could not render prompt, using fallback");
                return None;
            }
        };

        match self.ai.generate(&prompt).await {
            Ok(text) => {
                debug!(prompt = id.as_str(), response = %text, "AI raw response");
                Some(text)
            }
            Err(e) => {
                error!(
                    prompt = id.as_str(),
                    error = %e,
                    model = %self.ai.model(),
                    host = %self.ai.host(),
                    "AI request failed, using fallback"
                );
                None
            }
        }
    }
}
