//! Parsing helpers for AI backend responses
//!
//! Model output is free-form text that usually, but not always, contains a
//! JSON array. Extraction is greedy: it spans from the first `[` to the last
//! `]` in the text, newlines included. If the model echoes an example array
//! ahead of its answer, both end up in the span and parsing fails, which sends
//! callers down their fallback path.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::insights::{next_insight_id, Impact, Insight, InsightType};

/// Title given to insights that arrive without one
pub const DEFAULT_INSIGHT_TITLE: &str = "Financial Insight";

/// Prefix of ids generated for model insights
pub const AI_INSIGHT_PREFIX: &str = "ai-insight";

/// Find the greedy bracket-delimited span in `text`
pub fn extract_json_array(text: &str) -> Result<Option<&str>> {
    let pattern = Regex::new(r"(?s)\[.*\]")?;
    Ok(pattern.find(text).map(|m| m.as_str()))
}

fn truncate(text: &str) -> String {
    const MAX: usize = 200;
    if text.chars().count() > MAX {
        format!("{}...", text.chars().take(MAX).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Parse the bracketed span of `response` as a list of JSON values
fn parse_json_array(response: &str) -> Result<Vec<Value>> {
    let array = extract_json_array(response)?.ok_or_else(|| {
        Error::InvalidData(format!(
            "No JSON array found in AI response | Raw: {}",
            truncate(response.trim())
        ))
    })?;

    serde_json::from_str(array).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON array from AI: {} | Raw: {}",
            e,
            truncate(array)
        ))
    })
}

/// Parse insights from AI response
///
/// Every object element becomes an `Insight`; missing or unknown fields take
/// defaults and `created_at` is stamped with `now`. Non-object elements are
/// skipped.
pub fn parse_insights(response: &str, now: DateTime<Utc>) -> Result<Vec<Insight>> {
    let values = parse_json_array(response)?;
    Ok(values
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| normalize_insight(obj, now))
        .collect())
}

fn normalize_insight(obj: &Map<String, Value>, now: DateTime<Utc>) -> Insight {
    let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => next_insight_id(AI_INSIGHT_PREFIX),
    };

    Insight {
        id,
        kind: text("type")
            .and_then(|t| t.parse::<InsightType>().ok())
            .unwrap_or_default(),
        title: text("title").unwrap_or_else(|| DEFAULT_INSIGHT_TITLE.to_string()),
        description: text("description").unwrap_or_default(),
        category: text("category").filter(|c| !c.trim().is_empty()),
        impact: text("impact")
            .and_then(|i| i.parse::<Impact>().ok())
            .unwrap_or_default(),
        // Only an explicit `false` turns it off
        actionable: !matches!(obj.get("actionable"), Some(Value::Bool(false))),
        created_at: now,
    }
}

/// Parse a list of strings from AI response
///
/// Tries the JSON array first. If there is none, or it is not an array of
/// strings, the raw text is split into bullet lines instead. At most `limit`
/// entries are returned either way.
pub fn parse_string_list(response: &str, limit: usize) -> Vec<String> {
    match parse_json_strings(response) {
        Ok(items) => items.into_iter().take(limit).collect(),
        Err(e) => {
            tracing::debug!(error = %e, "No JSON string array in AI response, splitting lines");
            parse_bullet_lines(response, limit)
        }
    }
}

fn parse_json_strings(response: &str) -> Result<Vec<String>> {
    let values = parse_json_array(response)?;
    values
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s.trim().to_string()),
            other => Err(Error::InvalidData(format!(
                "Expected a string in AI array, got {}",
                truncate(&other.to_string())
            ))),
        })
        .filter(|r| !matches!(r, Ok(s) if s.is_empty()))
        .collect()
}

/// Split text into non-blank lines without their leading bullet marker
pub fn parse_bullet_lines(response: &str, limit: usize) -> Vec<String> {
    response
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix(|c: char| matches!(c, '-' | '*' | '•'))
        .map(str::trim_start)
        .unwrap_or(line)
}
