use serde_json::Value;

use super::spec::{EvaluationResult, Recommendation};
use crate::prelude::{Error, Result};

/// Parses the first balanced JSON object found in a model reply. Models
/// frequently wrap the payload in markdown fences or prose, so a direct
/// `from_str` is only the happy path.
pub fn extract_first_json_object(s: &str) -> Result<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(s.trim()) {
        if v.is_object() {
            return Ok(v);
        }
    }
    let mut depth = 0usize;
    let mut start = None;
    for (i, c) in s.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        let candidate = &s[start.unwrap()..=i];
                        return serde_json::from_str(candidate).map_err(|e| {
                            Error::ProviderFormat(format!("invalid JSON object: {}", e))
                        });
                    }
                }
            }
            _ => {}
        }
    }
    Err(Error::ProviderFormat(
        "no JSON object in provider response".into(),
    ))
}

/// Collapses a free-text field to a single clean line.
pub fn clean_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes raw provider reply text into an `EvaluationResult`. Missing
/// fields get neutral placeholders; the score is clamped to 0..=10. Errors
/// only when no JSON object can be recovered at all, which the calling
/// variant turns into its degraded fallback.
pub fn verdict_from_text(text: &str) -> Result<EvaluationResult> {
    let value = extract_first_json_object(text)?;
    let score = score_from(value.get("score"));
    let recommendation = value
        .get("recommendation")
        .and_then(Value::as_str)
        .and_then(Recommendation::parse)
        .unwrap_or(Recommendation::Consider);
    Ok(EvaluationResult {
        score,
        strengths: field(&value, "strengths"),
        weaknesses: field(&value, "weaknesses"),
        justification: field(&value, "justification"),
        recommendation,
        error_note: None,
    })
}

fn field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(clean_line)
        .unwrap_or_else(|| "N/A".into())
}

fn score_from(value: Option<&Value>) -> i64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(5.0),
        // some models quote the number
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(5.0),
        _ => 5.0,
    };
    (raw.round() as i64).clamp(0, 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let r = verdict_from_text(
            r#"{"score": 7, "strengths": "solid rust", "weaknesses": "no k8s",
                "justification": "good overlap", "recommendation": "RECOMMEND"}"#,
        )
        .unwrap();
        assert_eq!(r.score, 7);
        assert_eq!(r.recommendation, Recommendation::Recommend);
        assert!(!r.is_degraded());
    }

    #[test]
    fn parses_fenced_json_with_prose() {
        let text = "Here is my evaluation:\n```json\n{\"score\": \"8.4\", \"recommendation\": \"CONSIDER\"}\n```\nHope that helps.";
        let r = verdict_from_text(text).unwrap();
        assert_eq!(r.score, 8);
        assert_eq!(r.recommendation, Recommendation::Consider);
        assert_eq!(r.strengths, "N/A");
    }

    #[test]
    fn clamps_out_of_range_scores() {
        let r = verdict_from_text(r#"{"score": 95, "recommendation": "REJECT"}"#).unwrap();
        assert_eq!(r.score, 10);
        let r = verdict_from_text(r#"{"score": -3}"#).unwrap();
        assert_eq!(r.score, 0);
    }

    #[test]
    fn flattens_multiline_fields() {
        let r = verdict_from_text(
            "{\"score\": 6, \"justification\": \"line one\\nline  two\"}",
        )
        .unwrap();
        assert_eq!(r.justification, "line one line two");
    }

    #[test]
    fn rejects_response_without_json() {
        assert!(verdict_from_text("I cannot evaluate this resume.").is_err());
    }

    #[test]
    fn takes_first_object_of_many() {
        let v = extract_first_json_object("{\"a\": 1} {\"b\": 2}").unwrap();
        assert_eq!(v["a"], 1);
    }
}
