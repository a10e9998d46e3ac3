use super::shared::chat_completion;
use super::{http_client, PROBE_TIMEOUT};
use crate::pkg::internal::ai::parse::verdict_from_text;
use crate::pkg::internal::ai::prompt::{criteria_block, truncate};
use crate::pkg::internal::ai::spec::{EvaluationResult, ProviderAdapter, ProviderConfig};
use crate::prelude::Result;

/// OpenAI chat completions with a recruiter system role.
pub struct ChatGptAdapter {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl ChatGptAdapter {
    pub fn new(config: ProviderConfig) -> Self {
        ChatGptAdapter {
            config,
            client: http_client(),
        }
    }

    fn prompt(&self, jd_text: &str, cv_text: &str, criteria: &[String]) -> String {
        format!(
            r#"You are an expert HR recruiter. Analyze the following CV against the Job Description and provide an evaluation.

JOB DESCRIPTION:
{jd}

{criteria}

CANDIDATE CV:
{cv}

Provide your evaluation in the following JSON format ONLY (no other text):
{{
    "score": <number from 0-10>,
    "strengths": "<3-5 key strengths of the candidate>",
    "weaknesses": "<2-3 areas where candidate doesn't match or could improve>",
    "justification": "<2-3 sentences explaining the score>",
    "recommendation": "<RECOMMEND, CONSIDER, or REJECT with brief reason>"
}}

Be objective and thorough. Consider: skills match, experience level, education fit, and overall alignment with role requirements."#,
            jd = truncate(jd_text, 4000),
            criteria = criteria_block(criteria),
            cv = truncate(cv_text, 6000),
        )
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for ChatGptAdapter {
    fn name(&self) -> &'static str {
        "chatgpt"
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
            Some("You are an expert HR recruiter."),
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
