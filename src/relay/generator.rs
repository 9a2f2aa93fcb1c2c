use anyhow::Result;
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::gemini;

/// The hosted model behind the relay: one prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Gemini through Rig's provider client.
pub struct GeminiGenerator {
    client: gemini::Client,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: &str, model: impl Into<String>) -> Self {
        Self {
            client: gemini::Client::new(api_key),
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let agent = self.client.agent(&self.model).build();
        Ok(agent.prompt(prompt).await?)
    }
}
