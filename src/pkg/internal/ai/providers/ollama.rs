use super::shared::chat_completion;
use super::{http_client, PROBE_TIMEOUT};
use crate::pkg::internal::ai::parse::verdict_from_text;
use crate::pkg::internal::ai::prompt::{criteria_block, truncate};
use crate::pkg::internal::ai::spec::{EvaluationResult, ProviderAdapter, ProviderConfig};
use crate::prelude::Result;

/// Local Ollama daemon through its OpenAI-compatible surface. No auth.
pub struct OllamaAdapter {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OllamaAdapter {
    pub fn new(config: ProviderConfig) -> Self {
        OllamaAdapter {
            config,
            client: http_client(),
        }
    }

    fn prompt(&self, jd_text: &str, cv_text: &str, criteria: &[String]) -> String {
        format!(
            r#"You are a technical recruiter. Evaluate the candidate CV against the job description.

JOB DESCRIPTION:
{jd}

{criteria}

CANDIDATE CV:
{cv}

Answer with ONLY a JSON object, no markdown, no extra text:
{{
    "score": <number 0-10>,
    "strengths": "<key strengths>",
    "weaknesses": "<key gaps>",
    "justification": "<short reasoning>",
    "recommendation": "<RECOMMEND / CONSIDER / REJECT>"
}}"#,
            jd = truncate(jd_text, 4000),
            criteria = criteria_block(criteria),
            cv = truncate(cv_text, 6000),
        )
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for OllamaAdapter {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn evaluate(
        &self,
        jd_text: &str,
        cv_text: &str,
        criteria: &[String],
    ) -> Result<EvaluationResult> {
        let text = chat_completion(
            &self.client,
            &format!("{}/v1", self.config.endpoint),
            None,
            &self.config.model,
            None,
            &self.prompt(jd_text, cv_text, criteria),
            0.3,
            1000,
        )
        .await;
        match text {
            Ok(text) => Ok(verdict_from_text(&text)
                .unwrap_or_else(|_| EvaluationResult::fallback("failed to parse response"))),
            Err(e) => Ok(EvaluationResult::fallback(&e.to_string())),
        }
    }

    async fn test_connection(&self) -> bool {
        let url = format!("{}/api/version", self.config.endpoint);
        match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(r) => r.status().is_success(),
            Err(_) => false,
        }
    }
}
