//! Analysis result normalizer
//!
//! The model is asked for a fixed schema but nothing guarantees it complies.
//! Every AI-derived field falls back to a fixed default when it is missing,
//! null, empty, of the wrong JSON type, or (for priority and sentiment) not a
//! member of the declared value set. Customer name and original query always
//! come from the request.

use serde_json::{Map, Value};

use crate::error::AnalysisFailure;
use crate::models::{NewTicketRequest, Priority, Sentiment, TicketAnalysis};

pub const DEFAULT_SUMMARY: &str = "No summary provided.";
pub const DEFAULT_ASSIGNEE: &str = "Tier 1 Support";
pub const DEFAULT_BUSINESS_IMPACT: &str = "Not assessed.";

/// Decode the reply text and normalize it. Anything that is not a JSON object
/// fails without a partial result.
pub fn parse_reply(text: &str, ticket: &NewTicketRequest) -> Result<TicketAnalysis, AnalysisFailure> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| {
        tracing::error!(error = %e, "Model reply is not valid JSON");
        AnalysisFailure
    })?;

    normalize(&value, ticket)
}

/// Normalize an already-decoded reply.
pub fn normalize(reply: &Value, ticket: &NewTicketRequest) -> Result<TicketAnalysis, AnalysisFailure> {
    let obj = reply.as_object().ok_or_else(|| {
        tracing::error!(kind = json_kind(reply), "Model reply is not a JSON object");
        AnalysisFailure
    })?;

    Ok(TicketAnalysis {
        customer_name: ticket.customer_name.clone(),
        original_query: ticket.issue_description.clone(),
        priority: enum_field(obj, "priority").unwrap_or_default(),
        sentiment: enum_field(obj, "sentiment").unwrap_or_default(),
        summary: text_field(obj, "summary").unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        suggested_tags: tags_field(obj, "suggestedTags"),
        suggested_assignee: text_field(obj, "suggestedAssignee")
            .unwrap_or_else(|| DEFAULT_ASSIGNEE.to_string()),
        business_impact: text_field(obj, "businessImpact")
            .unwrap_or_else(|| DEFAULT_BUSINESS_IMPACT.to_string()),
    })
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn enum_field<T: std::str::FromStr>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let raw = text_field(obj, key)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(field = key, value = %raw, "Model returned a value outside the allowed set, using default");
            None
        }
    }
}

// Non-string entries are dropped; order is kept.
fn tags_field(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
