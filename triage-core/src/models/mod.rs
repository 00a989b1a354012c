pub mod analysis;
pub mod ticket;

pub use analysis::{IssueType, NewTicketRequest, Priority, Sentiment, TicketAnalysis};
pub use ticket::{Ticket, TicketStatus};
