use std::collections::HashMap;
use std::sync::Arc;

use super::providers::chatgpt::ChatGptAdapter;
use super::providers::deepseek::DeepSeekAdapter;
use super::providers::gemini::GeminiAdapter;
use super::providers::huggingface::HuggingFaceAdapter;
use super::providers::ollama::OllamaAdapter;
use super::spec::{ProviderAdapter, ProviderConfig};
use crate::prelude::{Error, Result};

type AdapterBuilder = Box<dyn Fn(ProviderConfig) -> Arc<dyn ProviderAdapter> + Send + Sync>;

/// Adapters keyed by provider name. Variant selection is a table lookup;
/// tests register scripted adapters through the same door the built-ins use.
pub struct ProviderRegistry {
    builders: HashMap<String, AdapterBuilder>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        ProviderRegistry {
            builders: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = ProviderRegistry::new();
        registry.register("gemini", |c| Arc::new(GeminiAdapter::new(c)));
        registry.register("chatgpt", |c| Arc::new(ChatGptAdapter::new(c)));
        registry.register("deepseek", |c| Arc::new(DeepSeekAdapter::new(c)));
        registry.register("huggingface", |c| Arc::new(HuggingFaceAdapter::new(c)));
        registry.register("ollama", |c| Arc::new(OllamaAdapter::new(c)));
        registry
    }

    pub fn register<F>(&mut self, name: &str, builder: F)
    where
        F: Fn(ProviderConfig) -> Arc<dyn ProviderAdapter> + Send + Sync + 'static,
    {
        self.builders.insert(name.to_lowercase(), Box::new(builder));
    }

    pub fn build(&self, config: &ProviderConfig) -> Result<Arc<dyn ProviderAdapter>> {
        let builder = self
            .builders
            .get(&config.provider.to_lowercase())
            .ok_or_else(|| {
                Error::ProviderConfig(format!("unknown provider: {}", config.provider))
            })?;
        Ok(builder(config.clone()))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        ProviderRegistry::with_builtins()
    }
}
