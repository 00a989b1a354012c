use std::sync::Arc;

use triage_core::{GeminiClient, GeminiConfig, TicketAnalyzer, TicketStore, TriageConfig};

/// Everything a request needs: the analyzer, the ticket list and the config.
pub struct AppState {
    pub analyzer: TicketAnalyzer,
    pub store: TicketStore,
    pub config: TriageConfig,
}

impl AppState {
    pub fn new(analyzer: TicketAnalyzer, config: TriageConfig) -> Self {
        let store = if config.store.seed_demo_tickets {
            TicketStore::with_demo_tickets()
        } else {
            TicketStore::new()
        };

        Self {
            analyzer,
            store,
            config,
        }
    }

    /// Build the production state: a Gemini-backed analyzer using `api_key`.
    pub fn from_config(config: TriageConfig, api_key: String) -> anyhow::Result<Self> {
        let gemini_config = GeminiConfig::from_model_config(api_key, &config.model);
        let client = GeminiClient::new(gemini_config)?;
        let analyzer = TicketAnalyzer::new(Arc::new(client));
        Ok(Self::new(analyzer, config))
    }
}
