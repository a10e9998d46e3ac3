pub mod chatgpt;
pub mod deepseek;
pub mod gemini;
pub mod huggingface;
pub mod ollama;
mod shared;

use std::time::Duration;

pub const EVALUATE_TIMEOUT: Duration = Duration::from_secs(60);
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(EVALUATE_TIMEOUT)
        .build()
        .unwrap_or_default()
}
