use serde::{Deserialize, Serialize};

use crate::models::{NewTicketRequest, TicketAnalysis, TicketStatus};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TriageRequest {
    Analyze {
        ticket: NewTicketRequest,
    },
    ListTickets,
    GetTicket {
        id: String,
    },
    CreateTicket {
        analysis: TicketAnalysis,
    },
    UpdateStatus {
        id: String,
        status: TicketStatus,
    },
    Dashboard,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TriageResponse {
    pub status: String,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub version: String,
}

impl TriageResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            error: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(msg.into()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// An error for a lookup that matched nothing.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: "not_found".to_string(),
            ..Self::err(msg)
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    pub fn is_not_found(&self) -> bool {
        self.status == "not_found"
    }
}
