use super::shared::chat_completion;
use super::{http_client, PROBE_TIMEOUT};
use crate::pkg::internal::ai::parse::verdict_from_text;
use crate::pkg::internal::ai::prompt::{criteria_block, truncate};
use crate::pkg::internal::ai::spec::{EvaluationResult, ProviderAdapter, ProviderConfig};
use crate::prelude::Result;

/// DeepSeek, OpenAI-compatible API at its own endpoint.
pub struct DeepSeekAdapter {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl DeepSeekAdapter {
    pub fn new(config: ProviderConfig) -> Self {
        DeepSeekAdapter {
            config,
            client: http_client(),
        }
    }

    fn prompt(&self, jd_text: &str, cv_text: &str, criteria: &[String]) -> String {
        format!(
            r#"You are a meticulous technical recruiter. Compare the candidate CV with the job description.

JOB DESCRIPTION:
{jd}

{criteria}

CANDIDATE CV:
{cv}

Score strictly: missing core stack or required experience must pull the score down hard.

Return ONLY valid JSON:
{{
    "score": <number 0-10>,
    "strengths": "<key strengths>",
    "weaknesses": "<gaps and mismatches>",
    "justification": "<why this score>",
    "recommendation": "<RECOMMEND / CONSIDER / REJECT>"
}}"#,
            jd = truncate(jd_text, 4000),
            criteria = criteria_block(criteria),
            cv = truncate(cv_text, 6000),
        )
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for DeepSeekAdapter {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    async fn evaluate(
        &self,
        jd_text: &str,
        cv_text: &str,
        criteria: &[String],
    ) -> Result<EvaluationResult> {
        if self.config.api_key.is_empty() {
            return Ok(EvaluationResult::fallback("API key not configured"));
        }
        let text = chat_completion(
            &self.client,
            &self.config.endpoint,
            Some(&self.config.api_key),
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
        if self.config.api_key.is_empty() {
            return false;
        }
        let url = format!("{}/models", self.config.endpoint);
        match self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r.status().is_success(),
            Err(_) => false,
        }
    }
}
