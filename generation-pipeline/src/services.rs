//! Model-call transport behind a trait so orchestrators can be tested
//! without network access.

use std::{sync::Arc, time::Duration};

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use common::{error::AppError, utils::config::AppConfig};
use tracing::debug;

use crate::{config::GenerationTuning, prompts::GenerationRequest};

/// The single capability orchestrators need from a model backend: turn an
/// assembled request into raw response text.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate_raw(&self, request: GenerationRequest) -> Result<String, AppError>;
}

/// OpenAI-compatible chat backend with a per-call timeout.
pub struct OpenAiGenerationService {
    client: Arc<Client<OpenAIConfig>>,
    tuning: GenerationTuning,
}

impl OpenAiGenerationService {
    pub fn new(client: Arc<Client<OpenAIConfig>>, tuning: GenerationTuning) -> Self {
        Self { client, tuning }
    }

    pub fn from_config(config: &AppConfig, tuning: GenerationTuning) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_base_url);
        Self::new(Arc::new(Client::with_config(openai_config)), tuning)
    }
}

#[async_trait]
impl GenerationService for OpenAiGenerationService {
    async fn generate_raw(&self, request: GenerationRequest) -> Result<String, AppError> {
        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages([
                ChatCompletionRequestSystemMessage::from(request.system_prompt.as_str()).into(),
                ChatCompletionRequestUserMessage::from(request.user_prompt.as_str()).into(),
            ])
            .build()?;

        debug!(model = %request.model, "dispatching generation request");

        let response = tokio::time::timeout(
            Duration::from_secs(self.tuning.request_timeout_secs),
            self.client.chat().create(chat_request),
        )
        .await
        .map_err(|_| {
            AppError::Generation(format!(
                "model call timed out after {}s",
                self.tuning.request_timeout_secs
            ))
        })??;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::Generation("model returned an empty response".to_string()))
    }
}
