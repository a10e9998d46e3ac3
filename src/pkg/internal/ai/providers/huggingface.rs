use super::shared::chat_completion;
use super::http_client;
use crate::pkg::internal::ai::parse::verdict_from_text;
use crate::pkg::internal::ai::prompt::{criteria_block, truncate};
use crate::pkg::internal::ai::spec::{EvaluationResult, ProviderAdapter, ProviderConfig};
use crate::prelude::Result;

/// HuggingFace inference router, OpenAI-compatible. Tighter truncation than
/// the cloud providers and a deliberately generous prompt.
pub struct HuggingFaceAdapter {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl HuggingFaceAdapter {
    pub fn new(config: ProviderConfig) -> Self {
        HuggingFaceAdapter {
            config,
            client: http_client(),
        }
    }

    fn prompt(&self, jd_text: &str, cv_text: &str, criteria: &[String]) -> String {
        format!(
            r#"You are a SUPPORTIVE recruiter looking for POTENTIAL in candidates. Evaluate this CV holistically.

JOB DESCRIPTION:
{jd}

{criteria}

CANDIDATE CV:
{cv}

SCORING APPROACH - Be GENEROUS and consider ALL factors:
- 8-10: Strong candidate - has most required skills OR strong transferable skills
- 6-7: Good potential - may lack some requirements but shows promise
- 4-5: Worth considering - has some relevant background, trainable
- 2-3: Significant gaps - but might fit a junior role
- 0-1: Completely unrelated field

Consider POTENTIAL, not just current skills. Add points for strengths, only subtract for major gaps.

Return JSON only:
{{
    "score": <0-10>,
    "strengths": "<what this candidate brings to the table>",
    "weaknesses": "<gaps that can be addressed with training>",
    "justification": "<why this score - focus on positives>",
    "recommendation": "<RECOMMEND/CONSIDER/REJECT>"
}}"#,
            jd = truncate(jd_text, 3000),
            criteria = criteria_block(criteria),
            cv = truncate(cv_text, 4000),
        )
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for HuggingFaceAdapter {
    fn name(&self) -> &'static str {
        "huggingface"
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
            0.7,
            1500,
        )
        .await;
        match text {
            Ok(text) => Ok(verdict_from_text(&text)
                .unwrap_or_else(|_| EvaluationResult::fallback("failed to parse response"))),
            Err(e) => Ok(EvaluationResult::fallback(&e.to_string())),
        }
    }

    /// The router has no cheap list endpoint, so probe with a 1-token
    /// completion.
    async fn test_connection(&self) -> bool {
        if self.config.api_key.is_empty() {
            return false;
        }
        chat_completion(
            &self.client,
            &self.config.endpoint,
            Some(&self.config.api_key),
            &self.config.model,
            None,
            "Hi",
            0.0,
            5,
        )
        .await
        .is_ok()
    }
}
