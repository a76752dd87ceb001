//! Sentiment overview via an OpenAI-compatible chat API

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use cinetrend_core::{CineResult, SentimentSource, SentimentSummary};
use tracing::{debug, instrument};

use crate::error::SourceError;

pub const DEFAULT_SENTIMENT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You are a film industry analyst. Answer concisely and factually.";

/// Chat-completion client asking for a title's lead actor and audience sentiment
#[derive(Debug, Clone)]
pub struct SentimentClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl SentimentClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.into());
        Self {
            client: Client::with_config(config),
            model: DEFAULT_SENTIMENT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    async fn complete(&self, prompt: String, max_tokens: u32) -> Result<Option<String>, SourceError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()
                    .map_err(|e| SourceError::CompletionFailed(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()
                    .map_err(|e| SourceError::CompletionFailed(e.to_string()))?
                    .into(),
            ])
            .temperature(0.3)
            .max_tokens(max_tokens)
            .build()
            .map_err(|e| SourceError::CompletionFailed(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SourceError::CompletionFailed(format!("OpenAI API error: {}", e)))?;

        Ok(response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .and_then(clean_answer))
    }

    /// Ask for the lead actor, then for a sentiment overview
    ///
    /// `None` when the model gives no overview.
    #[instrument(skip(self))]
    pub async fn fetch(&self, title: &str) -> Result<Option<SentimentSummary>, SourceError> {
        let main_actor = self.complete(actor_prompt(title), 100).await?;
        debug!("Main actor for {}: {:?}", title, main_actor);

        let summary = self
            .complete(sentiment_prompt(title, main_actor.as_deref()), 250)
            .await?;

        Ok(summary.map(|summary| SentimentSummary {
            main_actor,
            summary,
        }))
    }
}

#[async_trait]
impl SentimentSource for SentimentClient {
    async fn summarize(&self, title: &str) -> CineResult<Option<SentimentSummary>> {
        Ok(self.fetch(title).await?)
    }
}

pub fn actor_prompt(title: &str) -> String {
    format!(
        "Who is the main actor in the movie '{}'? Reply with the name only.",
        title
    )
}

pub fn sentiment_prompt(title: &str, main_actor: Option<&str>) -> String {
    match main_actor {
        Some(actor) => format!(
            "What are audiences saying about the movie '{}' and its main actor '{}' right now? \
             Please provide a short sentiment overview.",
            title, actor
        ),
        None => format!(
            "What are audiences saying about the movie '{}' right now? \
             Please provide a short sentiment overview.",
            title
        ),
    }
}

/// Trim a model answer; blank answers count as no answer
fn clean_answer(text: &str) -> Option<String> {
    let text = text.trim().trim_matches('"').trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_name_title_and_actor() {
        assert!(actor_prompt("Alpha").contains("'Alpha'"));

        let with_actor = sentiment_prompt("Alpha", Some("Jane Doe"));
        assert!(with_actor.contains("'Alpha'"));
        assert!(with_actor.contains("'Jane Doe'"));

        let without = sentiment_prompt("Alpha", None);
        assert!(!without.contains("main actor"));
    }

    #[test]
    fn test_clean_answer() {
        assert_eq!(clean_answer("  \"Jane Doe\"\n"), Some("Jane Doe".to_string()));
        assert_eq!(clean_answer("   "), None);
        assert_eq!(clean_answer(""), None);
    }
}
