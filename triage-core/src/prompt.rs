//! Analysis request builder
//!
//! Turns a `NewTicketRequest` into the instruction prompt and the structured-output
//! schema sent to the generation backend. Both are pure functions of the input.

use serde_json::{json, Value};

use crate::models::{NewTicketRequest, Priority, Sentiment};

/// Field names the model must return, in schema order.
pub const ANALYSIS_FIELDS: [&str; 6] = [
    "priority",
    "sentiment",
    "summary",
    "suggestedTags",
    "suggestedAssignee",
    "businessImpact",
];

/// Prompt plus schema for one ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPrompt {
    pub prompt: String,
    pub schema: Value,
}

impl AnalysisPrompt {
    pub fn for_ticket(ticket: &NewTicketRequest) -> Self {
        Self {
            prompt: build_prompt(ticket),
            schema: response_schema(),
        }
    }
}

/// Build the instruction text. Customer name, category and description are
/// embedded verbatim.
pub fn build_prompt(ticket: &NewTicketRequest) -> String {
    format!(
        r#"You are an expert AI support ticket analyzer. Your task is to assess a new customer support ticket and provide a structured analysis in JSON format.
Analyze the ticket for urgency, customer sentiment, technical details, and business context.

Ticket Details:
- Customer Name: "{name}"
- Issue Category: "{category}"
- Issue Description: "{description}"

Based on the information, provide your analysis. For priority, use "{critical}" for issues like system outages or major security flaws affecting many users. Use "{high}" for issues severely impacting a single customer's business or indicating churn risk. Use "{medium}" for standard issues or feature requests. Use "{low}" for simple 'how-to' questions."#,
        name = ticket.customer_name,
        category = ticket.issue_type,
        description = ticket.issue_description,
        critical = Priority::Critical,
        high = Priority::High,
        medium = Priority::Medium,
        low = Priority::Low,
    )
}

/// Structured-output schema in the Gemini `responseSchema` dialect.
pub fn response_schema() -> Value {
    let priorities: Vec<&str> = Priority::ALL.iter().map(|p| p.as_str()).collect();
    let sentiments: Vec<&str> = Sentiment::ALL.iter().map(|s| s.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "priority": {
                "type": "STRING",
                "enum": priorities,
                "description": "The assessed priority level for this ticket."
            },
            "sentiment": {
                "type": "STRING",
                "enum": sentiments,
                "description": "The customer's sentiment."
            },
            "summary": {
                "type": "STRING",
                "description": "A concise, 1-2 sentence summary of the customer's issue."
            },
            "suggestedTags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of relevant keywords or tags for categorization."
            },
            "suggestedAssignee": {
                "type": "STRING",
                "description": "The recommended team or role to handle this ticket (e.g., 'Tier 1 Support', 'Billing Specialist', 'Senior Technical Team')."
            },
            "businessImpact": {
                "type": "STRING",
                "description": "A brief assessment of the potential business impact (e.g., revenue loss, churn risk, sales opportunity)."
            }
        },
        "required": ANALYSIS_FIELDS,
    })
}
