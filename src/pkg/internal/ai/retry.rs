use std::time::Duration;

use super::spec::{EvaluationResult, ProviderAdapter};

/// Bounded fixed-delay retry. Degraded-but-structured results wait a shorter
/// delay than outright call failures; the low attempt ceiling and small batch
/// sizes make exponential backoff not worth its complexity here.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub degraded_delay: Duration,
    pub error_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            degraded_delay: Duration::from_secs(2),
            error_delay: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        RetryExecutor { policy }
    }

    /// Drives `adapter.evaluate` under the policy. Infallible: after the
    /// attempt budget is spent the caller gets the last degraded result, or a
    /// synthesized fallback when every attempt errored.
    pub async fn execute(
        &self,
        adapter: &dyn ProviderAdapter,
        jd_text: &str,
        cv_text: &str,
        criteria: &[String],
    ) -> EvaluationResult {
        let mut last_degraded: Option<EvaluationResult> = None;
        for attempt in 1..=self.policy.max_attempts {
            match adapter.evaluate(jd_text, cv_text, criteria).await {
                Ok(result) if !result.is_degraded() => return result,
                Ok(result) => {
                    tracing::warn!(
                        provider = adapter.name(),
                        attempt,
                        note = result.error_note.as_deref().unwrap_or(""),
                        "degraded evaluation result"
                    );
                    last_degraded = Some(result);
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.degraded_delay).await;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        provider = adapter.name(),
                        attempt,
                        error = %err,
                        "provider call failed"
                    );
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.error_delay).await;
                    }
                }
            }
        }
        last_degraded.unwrap_or_else(|| EvaluationResult::fallback("max retries exceeded"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::pkg::internal::ai::spec::Recommendation;
    use crate::prelude::{Error, Result};

    enum Step {
        Clean(i64),
        Degraded(&'static str),
        Fail(&'static str),
    }

    struct ScriptedAdapter {
        steps: Vec<Step>,
        calls: AtomicU32,
    }

    impl ScriptedAdapter {
        fn new(steps: Vec<Step>) -> Self {
            ScriptedAdapter {
                steps,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ProviderAdapter for ScriptedAdapter {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn evaluate(
            &self,
            _jd: &str,
            _cv: &str,
            _criteria: &[String],
        ) -> Result<EvaluationResult> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            let step = self.steps.get(n).unwrap_or(self.steps.last().unwrap());
            match step {
                Step::Clean(score) => Ok(EvaluationResult {
                    score: *score,
                    strengths: "ok".into(),
                    weaknesses: "ok".into(),
                    justification: "ok".into(),
                    recommendation: Recommendation::Recommend,
                    error_note: None,
                }),
                Step::Degraded(note) => Ok(EvaluationResult::fallback(note)),
                Step::Fail(msg) => Err(Error::ProviderTransport((*msg).into())),
            }
        }

        async fn test_connection(&self) -> bool {
            true
        }
    }

    #[tokio::test(start_paused = true)]
    async fn returns_immediately_on_clean_result() {
        let adapter = ScriptedAdapter::new(vec![Step::Clean(8)]);
        let result = RetryExecutor::default()
            .execute(&adapter, "jd", "cv", &[])
            .await;
        assert_eq!(result.score, 8);
        assert!(!result.is_degraded());
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_second_attempt_with_two_calls() {
        let adapter = ScriptedAdapter::new(vec![Step::Fail("timeout"), Step::Clean(7)]);
        let result = RetryExecutor::default()
            .execute(&adapter, "jd", "cv", &[])
            .await;
        assert!(!result.is_degraded());
        assert_eq!(result.score, 7);
        assert_eq!(adapter.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_adapter_yields_fallback_after_exact_budget() {
        let adapter = ScriptedAdapter::new(vec![Step::Fail("connection refused")]);
        let result = RetryExecutor::default()
            .execute(&adapter, "jd", "cv", &[])
            .await;
        assert_eq!(adapter.calls(), 3);
        assert_eq!(result.score, 5);
        assert_eq!(result.error_note.as_deref(), Some("max retries exceeded"));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_degraded_attempts_return_last_result() {
        let adapter = ScriptedAdapter::new(vec![Step::Degraded("rate limited")]);
        let result = RetryExecutor::default()
            .execute(&adapter, "jd", "cv", &[])
            .await;
        assert_eq!(adapter.calls(), 3);
        assert!(result.is_degraded());
        assert_eq!(result.error_note.as_deref(), Some("rate limited"));
    }

    #[tokio::test(start_paused = true)]
    async fn mixed_error_then_degraded_keeps_degraded_result() {
        let adapter = ScriptedAdapter::new(vec![
            Step::Fail("reset by peer"),
            Step::Degraded("bad payload"),
            Step::Fail("reset by peer"),
        ]);
        let result = RetryExecutor::default()
            .execute(&adapter, "jd", "cv", &[])
            .await;
        assert_eq!(adapter.calls(), 3);
        assert_eq!(result.error_note.as_deref(), Some("bad payload"));
    }
}
