//! Built-in demo data: the seeded dashboard tickets and the sample submissions.

use chrono::Utc;

use crate::models::{
    IssueType, NewTicketRequest, Priority, Sentiment, Ticket, TicketAnalysis, TicketStatus,
};

/// Sample submissions offered by the CLI's `--sample` flag.
pub fn sample_requests() -> Vec<NewTicketRequest> {
    vec![
        NewTicketRequest {
            customer_name: "Sarah Chen".to_string(),
            customer_email: "sarah.chen@techcorp.com".to_string(),
            issue_type: IssueType::Technical,
            issue_description: "Our production system went down 30 minutes ago and we're losing customers. The dashboard shows error 500 on all API endpoints. This is extremely urgent as it's affecting our entire business operations. We have a major client presentation in 2 hours and need this fixed immediately!".to_string(),
        },
        NewTicketRequest {
            customer_name: "Michael Rodriguez".to_string(),
            customer_email: "m.rodriguez@startup.io".to_string(),
            issue_type: IssueType::Billing,
            issue_description: "I was charged twice for my subscription this month. Can someone please look into this and process a refund? I've been a loyal customer for 2 years.".to_string(),
        },
        NewTicketRequest {
            customer_name: "David Park".to_string(),
            customer_email: "david@smallbiz.com".to_string(),
            issue_type: IssueType::Account,
            issue_description: "I love your product but I'm thinking of upgrading my plan. Can someone walk me through the enterprise features?".to_string(),
        },
    ]
}

fn tags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Tickets the store starts with when seeding is enabled, newest first.
pub fn demo_tickets() -> Vec<Ticket> {
    let now = Utc::now();

    vec![
        Ticket {
            id: "T-KDE83H".to_string(),
            customer_name: "Mark Johnson".to_string(),
            description: "Payment processing failure...".to_string(),
            priority: Priority::High,
            status: TicketStatus::Open,
            analysis: TicketAnalysis {
                customer_name: "Mark Johnson".to_string(),
                original_query: "My payment failed but I was still charged. This is the second time this has happened and support was slow last time. I need this fixed now!".to_string(),
                priority: Priority::High,
                sentiment: Sentiment::Negative,
                summary: "Customer is reporting a recurring payment processing failure where they were charged despite the transaction failing.".to_string(),
                suggested_tags: tags(&["Billing", "Payment Failure", "Repeat Issue"]),
                suggested_assignee: "Billing Specialist".to_string(),
                business_impact: "High risk of customer churn due to repeat billing issues and previous poor support experience.".to_string(),
            },
            created_at: now,
        },
        Ticket {
            id: "T-NCL29A".to_string(),
            customer_name: "Lisa Wang".to_string(),
            description: "Feature request clarification...".to_string(),
            priority: Priority::Medium,
            status: TicketStatus::Open,
            analysis: TicketAnalysis {
                customer_name: "Lisa Wang".to_string(),
                original_query: "I was wondering if it's possible to export our analytics data to a custom BI tool? It's not a dealbreaker but would be a great help for our team.".to_string(),
                priority: Priority::Medium,
                sentiment: Sentiment::Neutral,
                summary: "Customer is making a feature inquiry about the possibility of exporting analytics data to a third-party BI tool.".to_string(),
                suggested_tags: tags(&["Feature Request", "Analytics", "Data Export"]),
                suggested_assignee: "Product Support".to_string(),
                business_impact: "Low immediate impact, but a valuable feature suggestion that could enhance the product for enterprise clients.".to_string(),
            },
            created_at: now,
        },
        Ticket {
            id: "T-PLQ67D".to_string(),
            customer_name: "Tom Wilson".to_string(),
            description: "Password reset help...".to_string(),
            priority: Priority::Low,
            status: TicketStatus::Resolved,
            analysis: TicketAnalysis {
                customer_name: "Tom Wilson".to_string(),
                original_query: "Hi, I can't seem to find the button to reset my password. Can you help?".to_string(),
                priority: Priority::Low,
                sentiment: Sentiment::Neutral,
                summary: "User is requesting assistance with a standard password reset procedure.".to_string(),
                suggested_tags: tags(&["Password Reset", "Account Access", "How-To"]),
                suggested_assignee: "Tier 1 Support".to_string(),
                business_impact: "Minimal business impact. Standard, low-complexity user support request.".to_string(),
            },
            created_at: now,
        },
    ]
}
