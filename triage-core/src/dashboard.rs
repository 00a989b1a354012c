use serde::Serialize;

use crate::models::{Priority, Sentiment, Ticket, TicketStatus};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

/// Aggregate view over the current ticket list.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_tickets: usize,
    pub open_tickets: usize,
    pub resolved_tickets: usize,
    pub by_priority: PriorityCounts,
    pub by_sentiment: SentimentCounts,
    /// Open and In Progress tickets, CRITICAL first; list order kept within a level.
    pub priority_queue: Vec<Ticket>,
    pub recently_resolved: Vec<Ticket>,
}

impl DashboardSummary {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let count_priority = |p: Priority| tickets.iter().filter(|t| t.priority == p).count();
        let count_sentiment =
            |s: Sentiment| tickets.iter().filter(|t| t.analysis.sentiment == s).count();

        let mut priority_queue: Vec<Ticket> =
            tickets.iter().filter(|t| t.status.is_open()).cloned().collect();
        priority_queue.sort_by_key(|t| t.priority.rank());

        let recently_resolved: Vec<Ticket> = tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Resolved)
            .cloned()
            .collect();

        Self {
            total_tickets: tickets.len(),
            open_tickets: priority_queue.len(),
            resolved_tickets: recently_resolved.len(),
            by_priority: PriorityCounts {
                critical: count_priority(Priority::Critical),
                high: count_priority(Priority::High),
                medium: count_priority(Priority::Medium),
                low: count_priority(Priority::Low),
            },
            by_sentiment: SentimentCounts {
                positive: count_sentiment(Sentiment::Positive),
                negative: count_sentiment(Sentiment::Negative),
                neutral: count_sentiment(Sentiment::Neutral),
            },
            priority_queue,
            recently_resolved,
        }
    }
}
