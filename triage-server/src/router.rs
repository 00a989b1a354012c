use triage_core::api::{TriageRequest, TriageResponse};
use triage_core::DashboardSummary;

use crate::state::AppState;

pub async fn handle_request(request: TriageRequest, state: &AppState) -> TriageResponse {
    match request {
        TriageRequest::Analyze { ticket } => match state.analyzer.analyze(&ticket).await {
            Ok(analysis) => respond(serde_json::to_value(analysis)),
            Err(e) => TriageResponse::err(e.to_string()),
        },
        TriageRequest::ListTickets => {
            let tickets = state.store.list().await;
            let count = tickets.len();
            respond(serde_json::to_value(tickets).map(|t| {
                serde_json::json!({
                    "tickets": t,
                    "count": count,
                })
            }))
        }
        TriageRequest::GetTicket { id } => match state.store.get(&id).await {
            Some(ticket) => respond(serde_json::to_value(ticket)),
            None => TriageResponse::not_found(format!("Ticket {} not found", id)),
        },
        TriageRequest::CreateTicket { analysis } => {
            let ticket = state.store.promote(analysis).await;
            respond(serde_json::to_value(ticket))
        }
        TriageRequest::UpdateStatus { id, status } => {
            match state.store.update_status(&id, status).await {
                Some(ticket) => {
                    tracing::info!(id = %id, status = %status, "Ticket status updated");
                    respond(serde_json::to_value(ticket))
                }
                None => TriageResponse::not_found(format!("Ticket {} not found", id)),
            }
        }
        TriageRequest::Dashboard => {
            let tickets = state.store.list().await;
            respond(serde_json::to_value(DashboardSummary::from_tickets(&tickets)))
        }
    }
}

fn respond(data: serde_json::Result<serde_json::Value>) -> TriageResponse {
    match data {
        Ok(v) => TriageResponse::ok(v),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            TriageResponse::err(format!("Serialization error: {}", e))
        }
    }
}
