use serde_json::{json, Value};

use super::{http_client, PROBE_TIMEOUT};
use crate::pkg::internal::ai::parse::verdict_from_text;
use crate::pkg::internal::ai::prompt::{criteria_block, truncate};
use crate::pkg::internal::ai::spec::{EvaluationResult, ProviderAdapter, ProviderConfig};
use crate::prelude::Result;

/// Google Gemini, native `generateContent` API with the key as a query
/// parameter. Runs the strict evaluation prompt.
pub struct GeminiAdapter {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl GeminiAdapter {
    pub fn new(config: ProviderConfig) -> Self {
        GeminiAdapter {
            config,
            client: http_client(),
        }
    }

    fn prompt(&self, jd_text: &str, cv_text: &str, criteria: &[String]) -> String {
        format!(
            r#"You are a strict technical recruiter. Analyze the CV against the JD.

JOB DESCRIPTION:
{jd}

{criteria}

CANDIDATE CV:
{cv}

EVALUATION RULES:
1. If the candidate's core technology stack does NOT match the JD, the score MUST be between 0 and 2.
2. If the candidate lacks the required years of experience, subtract accordingly.
3. If the candidate is irrelevant to the role, the score MUST be between 0 and 2.
4. Do NOT give high scores for "potential" if the hard skills are missing. Be strict.

Provide output in this JSON format ONLY:
{{
    "score": <number 0-10, overall fit>,
    "strengths": "<3-5 key strengths>",
    "weaknesses": "<critical missing skills or mismatches>",
    "justification": "<Explain WHY the score is low/high. Check tech stack match.>",
    "recommendation": "<RECOMMEND / CONSIDER / REJECT>"
}}"#,
            jd = truncate(jd_text, 4000),
            criteria = criteria_block(criteria),
            cv = truncate(cv_text, 6000),
        )
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> &'static str {
        "gemini"
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
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, self.config.api_key
        );
        let body = json!({
            "contents": [{"parts": [{"text": self.prompt(jd_text, cv_text, criteria)}]}],
            "generationConfig": {"temperature": 0.3, "maxOutputTokens": 1000},
        });
        let response = match self.client.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(e) => return Ok(EvaluationResult::fallback(&e.to_string())),
        };
        if !response.status().is_success() {
            return Ok(EvaluationResult::fallback(&format!(
                "API error: {}",
                response.status().as_u16()
            )));
        }
        let result: Value = match response.json().await {
            Ok(v) => v,
            Err(_) => return Ok(EvaluationResult::fallback("invalid response format")),
        };
        let text = match result["candidates"][0]["content"]["parts"][0]["text"].as_str() {
            Some(t) => t,
            None => return Ok(EvaluationResult::fallback("invalid response format")),
        };
        Ok(verdict_from_text(text)
            .unwrap_or_else(|_| EvaluationResult::fallback("failed to parse response")))
    }

    async fn test_connection(&self) -> bool {
        if self.config.api_key.is_empty() {
            return false;
        }
        let url = format!(
            "{}/models?key={}",
            self.config.endpoint, self.config.api_key
        );
        match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(r) => r.status().is_success(),
            Err(_) => false,
        }
    }
}
