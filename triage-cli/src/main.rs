//! triage-cli: command-line client for the triage HTTP API
//!
//! # Subcommands
//! - `analyze --name <n> --description <d> [--issue-type <t>] [--email <e>] [--save] [--json]`
//! - `analyze --sample <0..2> [--save] [--json]`: use a built-in sample ticket
//! - `tickets [--json]`: list tickets, newest first
//! - `ticket <id> [--json]`: show one ticket with its analysis
//! - `set-status <id> <status>`: move a ticket to Open, In Progress or Resolved
//! - `dashboard`: show queue counts
//! - `status`: show server health

use clap::{Parser, Subcommand};
use serde::Deserialize;
use triage_core::fixtures::sample_requests;
use triage_core::{IssueType, NewTicketRequest, Ticket, TicketAnalysis, TicketStatus};

const DEFAULT_SERVER: &str = "http://127.0.0.1:8787";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "triage-cli",
    version,
    about = "Submit support tickets for AI triage and inspect the ticket dashboard"
)]
struct Cli {
    /// Triage HTTP server URL (overrides TRIAGE_HTTP_URL env var)
    #[arg(long, env = "TRIAGE_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a new ticket
    Analyze {
        /// Customer name
        #[arg(long, required_unless_present = "sample")]
        name: Option<String>,

        /// Customer email
        #[arg(long, default_value = "")]
        email: String,

        /// Issue category: billing, technical, account or product
        #[arg(long, default_value = "technical", value_parser = parse_issue_type)]
        issue_type: IssueType,

        /// Issue description
        #[arg(long, required_unless_present = "sample")]
        description: Option<String>,

        /// Use one of the built-in sample tickets instead
        #[arg(long, conflicts_with_all = ["name", "description"])]
        sample: Option<usize>,

        /// Add the analyzed ticket to the dashboard
        #[arg(long)]
        save: bool,

        /// Print the raw JSON analysis
        #[arg(long)]
        json: bool,
    },

    /// List tickets
    Tickets {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one ticket and its analysis
    Ticket {
        /// Ticket id, e.g. T-KDE83H
        id: String,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a ticket's status
    SetStatus {
        /// Ticket id
        id: String,

        /// New status: "Open", "In Progress" or "Resolved"
        #[arg(value_parser = parse_ticket_status)]
        status: TicketStatus,
    },

    /// Show dashboard counts
    Dashboard,

    /// Show triage server status
    Status,
}

fn parse_issue_type(s: &str) -> Result<IssueType, String> {
    s.parse()
}

fn parse_ticket_status(s: &str) -> Result<TicketStatus, String> {
    s.parse()
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TicketList {
    pub tickets: Vec<Ticket>,
    pub count: usize,
}

// ============================================================================
// Submission and formatting
// ============================================================================

/// Resolve the ticket to submit from either a sample index or explicit fields.
pub fn build_submission(
    sample: Option<usize>,
    name: Option<String>,
    email: String,
    issue_type: IssueType,
    description: Option<String>,
) -> anyhow::Result<NewTicketRequest> {
    if let Some(index) = sample {
        let samples = sample_requests();
        let count = samples.len();
        return samples
            .into_iter()
            .nth(index)
            .ok_or_else(|| anyhow::anyhow!("sample must be between 0 and {}", count - 1));
    }

    let customer_name = name.ok_or_else(|| anyhow::anyhow!("--name is required"))?;
    let issue_description =
        description.ok_or_else(|| anyhow::anyhow!("--description is required"))?;

    Ok(NewTicketRequest {
        customer_name,
        customer_email: email,
        issue_type,
        issue_description,
    })
}

/// Human-readable analysis block.
pub fn format_analysis(a: &TicketAnalysis) -> String {
    let tags = if a.suggested_tags.is_empty() {
        "-".to_string()
    } else {
        a.suggested_tags.join(", ")
    };

    format!(
        "Customer:   {}\nPriority:   {}\nSentiment:  {}\nAssignee:   {}\nTags:       {}\n\nSummary:\n  {}\n\nBusiness impact:\n  {}\n",
        a.customer_name,
        a.priority,
        a.sentiment,
        a.suggested_assignee,
        tags,
        a.summary,
        a.business_impact,
    )
}

/// One line per ticket: id, priority, status, customer, description.
pub fn format_ticket_line(t: &Ticket) -> String {
    format!(
        "{:<9} {:<8} {:<11} {:<20} {}",
        t.id,
        t.priority.as_str(),
        t.status.as_str(),
        t.customer_name,
        t.description
    )
}

/// Ticket header followed by its full analysis.
pub fn format_ticket_detail(t: &Ticket) -> String {
    format!(
        "Ticket:     {}\nStatus:     {}\nCreated:    {}\n{}",
        t.id,
        t.status,
        t.created_at.format("%Y-%m-%d %H:%M UTC"),
        format_analysis(&t.analysis)
    )
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client() -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?)
}

fn check(resp: reqwest::blocking::Response) -> anyhow::Result<reqwest::blocking::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body: serde_json::Value = resp.json().unwrap_or_default();
    let message = body["error"].as_str().unwrap_or("request failed").to_string();
    anyhow::bail!("server returned {}: {}", status, message)
}

fn do_analyze(server: &str, ticket: NewTicketRequest, save: bool, json: bool) -> anyhow::Result<()> {
    let client = client()?;

    let resp = client.post(format!("{}/analyze", server)).json(&ticket).send()?;
    let analysis: TicketAnalysis = check(resp)?.json()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", format_analysis(&analysis));
    }

    if save {
        let resp = client.post(format!("{}/tickets", server)).json(&analysis).send()?;
        let ticket: Ticket = check(resp)?.json()?;
        eprintln!("Saved as {}", ticket.id);
    }

    Ok(())
}

fn do_tickets(server: &str, json: bool) -> anyhow::Result<()> {
    let resp = client()?.get(format!("{}/tickets", server)).send()?;
    let list: TicketList = check(resp)?.json()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&list.tickets)?);
        return Ok(());
    }

    if list.count == 0 {
        eprintln!("No tickets");
        return Ok(());
    }
    for t in &list.tickets {
        println!("{}", format_ticket_line(t));
    }
    Ok(())
}

fn do_ticket(server: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let resp = client()?.get(format!("{}/tickets/{}", server, id)).send()?;
    let ticket: Ticket = check(resp)?.json()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ticket)?);
    } else {
        print!("{}", format_ticket_detail(&ticket));
    }
    Ok(())
}

fn do_set_status(server: &str, id: &str, status: TicketStatus) -> anyhow::Result<()> {
    let resp = client()?
        .patch(format!("{}/tickets/{}/status", server, id))
        .json(&serde_json::json!({ "status": status }))
        .send()?;
    let ticket: Ticket = check(resp)?.json()?;

    println!("{}", format_ticket_line(&ticket));
    Ok(())
}

fn do_dashboard(server: &str) -> anyhow::Result<()> {
    let resp = client()?.get(format!("{}/dashboard", server)).send()?;
    let body: serde_json::Value = check(resp)?.json()?;

    println!("Total tickets:  {}", body["totalTickets"]);
    println!("Open:           {}", body["openTickets"]);
    println!("Resolved:       {}", body["resolvedTickets"]);
    println!(
        "By priority:    CRITICAL {} / HIGH {} / MEDIUM {} / LOW {}",
        body["byPriority"]["critical"],
        body["byPriority"]["high"],
        body["byPriority"]["medium"],
        body["byPriority"]["low"]
    );
    println!(
        "By sentiment:   POSITIVE {} / NEGATIVE {} / NEUTRAL {}",
        body["bySentiment"]["positive"],
        body["bySentiment"]["negative"],
        body["bySentiment"]["neutral"]
    );

    let queue: Vec<Ticket> = serde_json::from_value(body["priorityQueue"].clone())?;
    if !queue.is_empty() {
        println!("\nPriority queue:");
        for t in &queue {
            println!("  {}", format_ticket_line(t));
        }
    }
    Ok(())
}

fn do_status(server: &str) -> anyhow::Result<()> {
    let url = format!("{}/health", server);
    let resp = client()?.get(&url).send();

    match resp {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Triage server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:       {}", body["version"].as_str().unwrap_or("?"));
            println!("Model:         {}", body["model"].as_str().unwrap_or("?"));
            println!("Tickets:       {}", body["tickets"]);
        }
        Ok(r) => {
            anyhow::bail!("server unhealthy (HTTP {})", r.status());
        }
        Err(e) => {
            anyhow::bail!("cannot reach {}: {}", url, e);
        }
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Analyze {
            name,
            email,
            issue_type,
            description,
            sample,
            save,
            json,
        } => build_submission(sample, name, email, issue_type, description)
            .and_then(|ticket| do_analyze(&server, ticket, save, json)),
        Commands::Tickets { json } => do_tickets(&server, json),
        Commands::Ticket { id, json } => do_ticket(&server, &id, json),
        Commands::SetStatus { id, status } => do_set_status(&server, &id, status),
        Commands::Dashboard => do_dashboard(&server),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("triage-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{Priority, Sentiment};

    fn analysis(tags: &[&str]) -> TicketAnalysis {
        TicketAnalysis {
            customer_name: "Lisa Wang".to_string(),
            original_query: "Can we export analytics?".to_string(),
            priority: Priority::Medium,
            sentiment: Sentiment::Neutral,
            summary: "Feature inquiry about exporting analytics data.".to_string(),
            suggested_tags: tags.iter().map(|s| s.to_string()).collect(),
            suggested_assignee: "Product Support".to_string(),
            business_impact: "Low immediate impact.".to_string(),
        }
    }

    #[test]
    fn test_build_submission_from_sample() {
        let t = build_submission(Some(1), None, String::new(), IssueType::Technical, None).unwrap();
        assert_eq!(t.customer_name, "Michael Rodriguez");
        assert_eq!(t.issue_type, IssueType::Billing);
    }

    #[test]
    fn test_build_submission_sample_out_of_range() {
        let err = build_submission(Some(7), None, String::new(), IssueType::Technical, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "sample must be between 0 and 2");
    }

    #[test]
    fn test_build_submission_from_fields() {
        let t = build_submission(
            None,
            Some("Tom Wilson".to_string()),
            "tom@example.com".to_string(),
            IssueType::Account,
            Some("Where is the reset button?".to_string()),
        )
        .unwrap();
        assert_eq!(t.customer_name, "Tom Wilson");
        assert_eq!(t.customer_email, "tom@example.com");
        assert_eq!(t.issue_type, IssueType::Account);
        assert_eq!(t.issue_description, "Where is the reset button?");
    }

    #[test]
    fn test_build_submission_missing_description() {
        let result = build_submission(
            None,
            Some("Tom".to_string()),
            String::new(),
            IssueType::Account,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_format_analysis_lists_fields() {
        let out = format_analysis(&analysis(&["Feature Request", "Analytics"]));
        assert!(out.contains("Priority:   MEDIUM"));
        assert!(out.contains("Sentiment:  NEUTRAL"));
        assert!(out.contains("Tags:       Feature Request, Analytics"));
        assert!(out.contains("Assignee:   Product Support"));
    }

    #[test]
    fn test_format_analysis_without_tags() {
        let out = format_analysis(&analysis(&[]));
        assert!(out.contains("Tags:       -"));
    }

    #[test]
    fn test_format_ticket_line() {
        let t = Ticket {
            id: "T-NCL29A".to_string(),
            customer_name: "Lisa Wang".to_string(),
            description: "Feature request clarification...".to_string(),
            priority: Priority::Medium,
            status: TicketStatus::InProgress,
            analysis: analysis(&[]),
            created_at: chrono::Utc::now(),
        };
        let line = format_ticket_line(&t);
        assert!(line.starts_with("T-NCL29A  MEDIUM   In Progress"));
        assert!(line.ends_with("Feature request clarification..."));
    }

    #[test]
    fn test_format_ticket_detail() {
        let t = Ticket {
            id: "T-PLQ67D".to_string(),
            customer_name: "Lisa Wang".to_string(),
            description: "Feature inquiry about exportin...".to_string(),
            priority: Priority::Medium,
            status: TicketStatus::Resolved,
            analysis: analysis(&["Analytics"]),
            created_at: "2024-05-01T09:30:00Z".parse().unwrap(),
        };
        let out = format_ticket_detail(&t);
        assert!(out.starts_with("Ticket:     T-PLQ67D\nStatus:     Resolved\n"));
        assert!(out.contains("Created:    2024-05-01 09:30 UTC"));
        assert!(out.contains("Tags:       Analytics"));
        assert!(out.contains("Business impact:\n  Low immediate impact."));
    }

    #[test]
    fn test_parse_ticket_status() {
        assert_eq!(parse_ticket_status("In Progress"), Ok(TicketStatus::InProgress));
        assert_eq!(parse_ticket_status("Resolved"), Ok(TicketStatus::Resolved));
        assert!(parse_ticket_status("closed").is_err());
    }

    #[test]
    fn test_set_status_command_parses() {
        let cli = Cli::try_parse_from(["triage-cli", "set-status", "T-KDE83H", "In Progress"]).unwrap();
        match cli.command {
            Commands::SetStatus { id, status } => {
                assert_eq!(id, "T-KDE83H");
                assert_eq!(status, TicketStatus::InProgress);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_issue_type() {
        assert_eq!(parse_issue_type("billing"), Ok(IssueType::Billing));
        assert!(parse_issue_type("Billing").is_err());
    }
}
