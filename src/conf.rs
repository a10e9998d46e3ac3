use config::{Config, ConfigError, Environment};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub database_url: String,
    #[serde(default = "default_pool_size")]
    pub database_pool_max_connections: u32,
    #[serde(default = "default_jd_dir")]
    pub jd_dir: String,
    #[serde(default = "default_cv_dir")]
    pub cv_dir: String,
    #[serde(default = "default_queue_workers")]
    pub queue_workers: usize,
    #[serde(default = "default_job_timeout")]
    pub job_timeout_secs: u64,
}

fn default_pool_size() -> u32 {
    5
}

fn default_jd_dir() -> String {
    "jd".into()
}

fn default_cv_dir() -> String {
    "cv".into()
}

fn default_queue_workers() -> usize {
    2
}

fn default_job_timeout() -> u64 {
    600
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .add_source(Environment::default())
            .build()?;
        let s: Settings = conf.try_deserialize()?;
        Ok(s)
    }
}

/// Endpoint and model defaults per provider, applied when the stored
/// configuration row leaves them blank.
pub fn provider_defaults(provider: &str) -> (&'static str, &'static str) {
    match provider {
        "ollama" => ("http://localhost:11434", "llama3.2"),
        "chatgpt" => ("https://api.openai.com/v1", "gpt-4o-mini"),
        "deepseek" => ("https://api.deepseek.com", "deepseek-chat"),
        "huggingface" => (
            "https://router.huggingface.co/v1",
            "deepseek-ai/DeepSeek-V3.2-Exp:novita",
        ),
        _ => (
            "https://generativelanguage.googleapis.com/v1beta",
            "gemini-1.5-flash",
        ),
    }
}

lazy_static! {
    pub static ref settings: Settings = Settings::new().expect("improperly configured");
}
