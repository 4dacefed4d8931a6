//! Rule-based keyword categorizer
//!
//! Lower-cases description and merchant, joins them, and walks the rule table
//! in priority order. The first category with any keyword occurring as a
//! substring wins; there is no scoring across multiple matches.

use crate::models::{CategorizationResult, Category};

/// Confidence reported when a keyword rule matched
pub const MATCH_CONFIDENCE: f64 = 0.7;

/// Confidence reported when nothing matched and the result is `Other`
pub const DEFAULT_CONFIDENCE: f64 = 0.3;

/// Maximum number of categories returned by `suggestions`
const MAX_SUGGESTIONS: usize = 3;

/// Keyword rules in priority order. Order is significant.
///
/// Gifts & Donations has no rule; only the remote service produces it.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::FoodAndDining,
        &[
            "restaurant", "food", "cafe", "coffee", "dinner", "lunch", "breakfast", "pizza",
            "burger", "sushi", "bar", "pub", "grill", "diner", "mcdonalds", "subway",
            "starbucks", "kfc", "taco", "dominos",
        ],
    ),
    (
        Category::Transportation,
        &[
            "gas", "fuel", "gasoline", "uber", "lyft", "taxi", "bus", "train", "parking", "toll",
            "car", "auto", "shell", "exxon", "bp", "chevron",
        ],
    ),
    (
        Category::Shopping,
        &[
            "amazon", "target", "walmart", "costco", "shop", "store", "retail", "clothes",
            "clothing", "shoes", "mall", "purchase", "ebay", "etsy",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "movie", "cinema", "theater", "netflix", "spotify", "games", "gaming", "concert",
            "show", "event", "ticket", "entertainment",
        ],
    ),
    (
        Category::BillsAndUtilities,
        &[
            "electric", "electricity", "water", "gas", "internet", "phone", "cable", "utility",
            "bill", "payment", "insurance", "rent",
        ],
    ),
    (
        Category::Healthcare,
        &[
            "doctor", "hospital", "medical", "pharmacy", "health", "dental", "clinic",
            "medicine", "prescription", "cvs", "walgreens",
        ],
    ),
    (
        Category::Travel,
        &[
            "hotel", "airbnb", "airline", "flight", "airport", "motel", "resort", "booking",
            "expedia", "vacation", "cruise", "luggage",
        ],
    ),
    (
        Category::Education,
        &[
            "tuition", "school", "university", "college", "course", "textbook", "udemy",
            "coursera", "tutor", "seminar", "books",
        ],
    ),
    (
        Category::PersonalCare,
        &[
            "salon", "haircut", "barber", "spa", "cosmetics", "skincare", "beauty", "nail",
            "gym", "fitness", "massage",
        ],
    ),
    (
        Category::Business,
        &[
            "office", "software", "coworking", "conference", "invoice", "consulting", "supplies",
            "advertising", "wholesale",
        ],
    ),
];

/// Keyword-table categorizer used as the offline fallback
///
/// Pure function of its inputs; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordCategorizer;

impl KeywordCategorizer {
    pub fn new() -> Self {
        Self
    }

    /// Categorize an expense by description and optional merchant
    pub fn categorize(&self, description: &str, merchant: Option<&str>) -> CategorizationResult {
        let text = combine(description, merchant);

        let first = self.matching(&text).next();
        match first {
            Some(category) => CategorizationResult::new(category, MATCH_CONFIDENCE),
            None => CategorizationResult::new(Category::Other, DEFAULT_CONFIDENCE),
        }
    }

    /// Every qualifying category in priority order, at most three
    pub fn suggestions(&self, description: &str, merchant: Option<&str>) -> Vec<Category> {
        let text = combine(description, merchant);
        self.matching(&text).take(MAX_SUGGESTIONS).collect()
    }

    fn matching<'a>(&self, text: &'a str) -> impl Iterator<Item = Category> + 'a {
        CATEGORY_RULES
            .iter()
            .filter(move |(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
            .map(|(category, _)| *category)
    }
}

fn combine(description: &str, merchant: Option<&str>) -> String {
    format!(
        "{} {}",
        description.to_lowercase(),
        merchant.unwrap_or_default().to_lowercase()
    )
}
