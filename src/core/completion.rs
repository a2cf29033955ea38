use crate::config::CompletionConfig;
use crate::core::failure::{Failure, bounded};
use crate::error::{Error, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::responses::{
        CreateResponseArgs, EasyInputMessageArgs, InputItem, InputParam, OutputItem,
        OutputMessageContent, Role as ApiRole,
    },
};
use derive_more::Display;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Role {
    #[display("system")]
    System,
    #[display("user")]
    User,
    #[display("assistant")]
    Assistant,
}

impl From<Role> for ApiRole {
    fn from(role: Role) -> Self {
        match role {
            Role::System => ApiRole::System,
            Role::User => ApiRole::User,
            Role::Assistant => ApiRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

/// A hosted model that answers a list of role-tagged messages with one
/// assistant message.
pub trait CompletionClient: Send + Sync {
    fn complete(&self, request: CompletionRequest) -> impl Future<Output = Result<String>> + Send;
}

/// Talks to any OpenAI-compatible endpoint (Groq by default).
#[derive(Clone)]
pub struct OpenAiCompletionClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompletionClient {
    pub fn new(config: &CompletionConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.clone())
            .with_api_base(config.api_base.clone());

        Self {
            client: Client::with_config(openai_config),
        }
    }
}

impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let items = request
            .messages
            .iter()
            .map(|message| {
                Ok(InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(ApiRole::from(message.role))
                        .content(message.content.clone())
                        .build()?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let api_request = CreateResponseArgs::default()
            .model(request.model.clone())
            .temperature(request.temperature)
            .input(InputParam::Items(items))
            .build()?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .responses()
            .create(api_request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Completion request failed"))?;

        // Only the first message item counts as the reply.
        let message = response
            .output
            .into_iter()
            .find_map(|output| match output {
                OutputItem::Message(message) => Some(message),
                _ => None,
            })
            .ok_or_else(|| Error::custom("Completion service returned no message"))?;

        let mut content = String::new();
        for part in message.content {
            match part {
                OutputMessageContent::OutputText(text) => content.push_str(&text.text),
                other => tracing::warn!(content = ?other, "Skipping non-text output"),
            }
        }

        Ok(content)
    }
}

/// The one client both the summary and the chat flows go through, with the
/// model and deadline every request shares.
pub struct Completer<C> {
    client: C,
    model: String,
    timeout: Option<Duration>,
}

impl<C: CompletionClient> Completer<C> {
    pub fn new(client: C, model: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            client,
            model: model.into(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn request(&self, temperature: f32, messages: Vec<ChatMessage>) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            temperature,
            messages,
        }
    }

    pub async fn complete(
        &self,
        temperature: f32,
        messages: Vec<ChatMessage>,
    ) -> std::result::Result<String, Failure> {
        let request = self.request(temperature, messages);
        bounded(self.timeout, self.client.complete(request)).await
    }
}
