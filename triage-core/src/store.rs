//! In-memory ticket list. Lives for the life of the process; newest first.

use std::collections::VecDeque;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::fixtures;
use crate::models::{Ticket, TicketAnalysis, TicketStatus};

/// Characters of the summary kept in a ticket's short description.
pub const DESCRIPTION_CHARS: usize = 30;

#[derive(Debug, Default)]
pub struct TicketStore {
    tickets: RwLock<VecDeque<Ticket>>,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demo_tickets() -> Self {
        Self {
            tickets: RwLock::new(fixtures::demo_tickets().into()),
        }
    }

    /// Turn an accepted analysis into an Open ticket at the head of the list.
    pub async fn promote(&self, analysis: TicketAnalysis) -> Ticket {
        let mut tickets = self.tickets.write().await;

        let mut id = new_ticket_id();
        while tickets.iter().any(|t| t.id == id) {
            id = new_ticket_id();
        }

        let ticket = Ticket {
            id,
            customer_name: analysis.customer_name.clone(),
            description: short_description(&analysis.summary),
            priority: analysis.priority,
            status: TicketStatus::Open,
            analysis,
            created_at: Utc::now(),
        };

        tickets.push_front(ticket.clone());
        tracing::info!(id = %ticket.id, priority = %ticket.priority, "Ticket created");

        ticket
    }

    pub async fn list(&self) -> Vec<Ticket> {
        self.tickets.read().await.iter().cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<Ticket> {
        self.tickets.read().await.iter().find(|t| t.id == id).cloned()
    }

    /// Returns the updated ticket, or `None` if the id is unknown.
    pub async fn update_status(&self, id: &str, status: TicketStatus) -> Option<Ticket> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets.iter_mut().find(|t| t.id == id)?;
        ticket.status = status;
        tracing::info!(id = %id, status = %status, "Ticket status updated");
        Some(ticket.clone())
    }

    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}

/// `T-` followed by six uppercase hex characters.
fn new_ticket_id() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("T-{}", &hex[..6])
}

fn short_description(summary: &str) -> String {
    let head: String = summary.chars().take(DESCRIPTION_CHARS).collect();
    format!("{}...", head)
}
