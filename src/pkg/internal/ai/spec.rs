use serde::{Deserialize, Serialize};

use crate::prelude::Result;

/// Normalized output of one provider call. `error_note` present means the
/// result is a degraded fallback rather than a real model judgment; it is
/// still structurally complete so callers never need a second error channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: i64,
    pub strengths: String,
    pub weaknesses: String,
    pub justification: String,
    pub recommendation: Recommendation,
    pub error_note: Option<String>,
}

impl EvaluationResult {
    /// Canonical neutral fallback: score 5, CONSIDER. Every provider variant
    /// uses this one, so downstream consumers see a single degraded shape.
    pub fn fallback(error: &str) -> Self {
        EvaluationResult {
            score: 5,
            strengths: "Unable to analyze - AI provider unavailable".into(),
            weaknesses: "Unable to analyze - AI provider unavailable".into(),
            justification: format!(
                "Automatic evaluation failed: {}. Please review manually.",
                error
            ),
            recommendation: Recommendation::Consider,
            error_note: Some(error.to_string()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error_note.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Recommend,
    Consider,
    Reject,
}

impl Recommendation {
    /// Models often answer "RECOMMEND with brief reason" rather than the bare
    /// token, so match on containment, strongest verdict first.
    pub fn parse(text: &str) -> Option<Recommendation> {
        let upper = text.to_uppercase();
        if upper.contains("RECOMMEND") && !upper.contains("NOT RECOMMEND") {
            Some(Recommendation::Recommend)
        } else if upper.contains("REJECT") {
            Some(Recommendation::Reject)
        } else if upper.contains("CONSIDER") {
            Some(Recommendation::Consider)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Recommend => "RECOMMEND",
            Recommendation::Consider => "CONSIDER",
            Recommendation::Reject => "REJECT",
        }
    }
}

/// Active backend configuration, resolved from the `ai_settings` row once at
/// job start. `endpoint` already has provider defaults and the ollama
/// host/port folded in.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub endpoint: String,
}

/// Uniform capability over one AI backend. `evaluate` absorbs transport and
/// format failures into a degraded `EvaluationResult`; an `Err` from it is
/// reserved for conditions the variant could not express as a result at all.
#[async_trait::async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn evaluate(
        &self,
        jd_text: &str,
        cv_text: &str,
        criteria: &[String],
    ) -> Result<EvaluationResult>;

    /// Lightweight live probe. Swallows all errors as `false`.
    async fn test_connection(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_neutral_and_degraded() {
        let r = EvaluationResult::fallback("connection refused");
        assert_eq!(r.score, 5);
        assert_eq!(r.recommendation, Recommendation::Consider);
        assert!(r.is_degraded());
        assert!(r.justification.contains("connection refused"));
    }

    #[test]
    fn recommendation_parses_verbose_answers() {
        assert_eq!(
            Recommendation::parse("RECOMMEND - strong skill match"),
            Some(Recommendation::Recommend)
        );
        assert_eq!(
            Recommendation::parse("reject, wrong stack"),
            Some(Recommendation::Reject)
        );
        assert_eq!(
            Recommendation::parse("CONSIDER for a junior role"),
            Some(Recommendation::Consider)
        );
        assert_eq!(Recommendation::parse("maybe"), None);
    }

    #[test]
    fn recommendation_serializes_screaming() {
        let s = serde_json::to_string(&Recommendation::Recommend).unwrap();
        assert_eq!(s, "\"RECOMMEND\"");
    }
}
