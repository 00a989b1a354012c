pub mod analyzer;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fixtures;
pub mod gemini;
pub mod models;
pub mod normalize;
pub mod prompt;
pub mod store;

pub use analyzer::TicketAnalyzer;
pub use config::TriageConfig;
pub use dashboard::DashboardSummary;
pub use error::{AnalysisFailure, TriageError};
pub use gemini::{
    GeminiClient, GeminiConfig, GenerationBackend, GenerationError, DEFAULT_BASE_URL,
    DEFAULT_MODEL,
};
pub use models::{
    IssueType, NewTicketRequest, Priority, Sentiment, Ticket, TicketAnalysis, TicketStatus,
};
pub use store::TicketStore;
