use serde_json::{json, Value};

use crate::prelude::{Error, Result};

/// One round against an OpenAI-compatible `/chat/completions` endpoint.
/// ChatGPT, DeepSeek, HuggingFace router and Ollama all speak this shape;
/// only endpoint, auth and generation knobs differ.
pub(super) async fn chat_completion(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: Option<&str>,
    model: &str,
    system: Option<&str>,
    prompt: &str,
    temperature: f64,
    max_tokens: u32,
) -> Result<String> {
    let mut messages = Vec::new();
    if let Some(system) = system {
        messages.push(json!({"role": "system", "content": system}));
    }
    messages.push(json!({"role": "user", "content": prompt}));

    let mut request = client
        .post(format!("{}/chat/completions", endpoint))
        .json(&json!({
            "model": model,
            "messages": messages,
            "temperature": temperature,
            "max_tokens": max_tokens,
        }));
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request
        .send()
        .await
        .map_err(|e| Error::ProviderTransport(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::ProviderTransport(format!("API error: {}", status.as_u16())));
    }
    let body: Value = response
        .json()
        .await
        .map_err(|e| Error::ProviderFormat(e.to_string()))?;
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::ProviderFormat("missing completion content".into()))
}
