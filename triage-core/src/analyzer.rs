//! Ticket analyzer: prompt, one generation call, normalize.

use std::sync::Arc;

use crate::error::AnalysisFailure;
use crate::gemini::GenerationBackend;
use crate::models::{NewTicketRequest, TicketAnalysis};
use crate::normalize;
use crate::prompt::AnalysisPrompt;

#[derive(Clone)]
pub struct TicketAnalyzer {
    backend: Arc<dyn GenerationBackend>,
}

impl TicketAnalyzer {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Analyze one ticket. Every failure cause is logged here and surfaced as
    /// `AnalysisFailure`; nothing is retried.
    pub async fn analyze(&self, ticket: &NewTicketRequest) -> Result<TicketAnalysis, AnalysisFailure> {
        let request = AnalysisPrompt::for_ticket(ticket);

        let text = self
            .backend
            .generate(&request.prompt, &request.schema)
            .await
            .map_err(|e| {
                tracing::error!(model = self.backend.model(), error = %e, "Error calling generation API");
                AnalysisFailure
            })?;

        let analysis = normalize::parse_reply(&text, ticket)?;

        tracing::info!(
            customer = %analysis.customer_name,
            priority = %analysis.priority,
            sentiment = %analysis.sentiment,
            "Ticket analyzed"
        );

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{GeminiClient, GeminiConfig, GenerationError};
    use crate::models::{IssueType, Priority, Sentiment};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Backend returning a canned reply and recording the prompts it saw.
    struct StubBackend {
        reply: Result<String, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(code: u16) -> Self {
            Self {
                reply: Err(code),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerationBackend for StubBackend {
        async fn generate(
            &self,
            prompt: &str,
            _schema: &serde_json::Value,
        ) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(code) => Err(GenerationError::Api {
                    code: *code,
                    message: "boom".to_string(),
                }),
            }
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn ticket() -> NewTicketRequest {
        NewTicketRequest {
            customer_name: "Michael Rodriguez".to_string(),
            customer_email: "m.rodriguez@startup.io".to_string(),
            issue_type: IssueType::Billing,
            issue_description: "I was charged twice for my subscription this month.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_analyze_normalizes_backend_reply() {
        let backend = Arc::new(StubBackend::replying(
            r#"{"priority":"HIGH","sentiment":"NEGATIVE","summary":"Double charge.","suggestedTags":["Billing"],"suggestedAssignee":"Billing Specialist","businessImpact":"Churn risk."}"#,
        ));
        let analyzer = TicketAnalyzer::new(backend.clone());

        let analysis = analyzer.analyze(&ticket()).await.unwrap();

        assert_eq!(analysis.customer_name, "Michael Rodriguez");
        assert_eq!(analysis.original_query, ticket().issue_description);
        assert_eq!(analysis.priority, Priority::High);
        assert_eq!(analysis.sentiment, Sentiment::Negative);
        assert_eq!(analysis.suggested_assignee, "Billing Specialist");

        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Issue Category: \"billing\""));
    }

    #[tokio::test]
    async fn test_analyze_backend_error_is_analysis_failure() {
        let backend = Arc::new(StubBackend::failing(500));
        let analyzer = TicketAnalyzer::new(backend.clone());

        let result = analyzer.analyze(&ticket()).await;

        assert_eq!(result, Err(AnalysisFailure));
        assert_eq!(backend.prompts.lock().unwrap().len(), 1, "no retry expected");
    }

    #[tokio::test]
    async fn test_analyze_malformed_reply_is_analysis_failure() {
        let analyzer = TicketAnalyzer::new(Arc::new(StubBackend::replying("Sure! Here is the analysis")));
        assert_eq!(analyzer.analyze(&ticket()).await, Err(AnalysisFailure));
    }

    #[tokio::test]
    async fn test_analyze_end_to_end_with_gemini() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "{\"priority\":\"LOW\",\"suggestedTags\":[\"How-To\"]}" }] }
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GeminiClient::with_base_url(GeminiConfig::new("test-key"), mock_server.uri())
            .expect("Failed to create client");
        let analyzer = TicketAnalyzer::new(Arc::new(client));

        let analysis = analyzer.analyze(&ticket()).await.unwrap();

        assert_eq!(analysis.priority, Priority::Low);
        assert_eq!(analysis.sentiment, Sentiment::Neutral);
        assert_eq!(analysis.suggested_tags, vec!["How-To"]);
        assert_eq!(analysis.summary, "No summary provided.");
        assert_eq!(analyzer.model(), "gemini-2.5-flash");
    }
}
