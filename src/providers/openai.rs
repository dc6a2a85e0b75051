use serde::{Deserialize, Serialize};
use log::{debug, trace, error};
use std::time::Duration;

const MAX_LOGGED_ERROR_CHARS: usize = 512;

fn truncate(text: &str, max_chars: usize) -> &str
{   match text.char_indices().nth(max_chars)
    {   Some((idx, _)) => &text[..idx]
      , None => text
    }
}

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   fn system(content: &str) -> Self
    {   ChatMessage
        {   role: "system".to_string()
          , content: content.to_string()
        }
    }

    fn user(content: &str) -> Self
    {   ChatMessage
        {   role: "user".to_string()
          , content: content.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub temperature: f32
  , pub max_tokens: usize
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse
{   pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   pub message: ChatMessage
  , #[serde(default)]
    pub finish_reason: Option<String>
}

// ===== OpenAI Client =====

/// Chat-completion client for OpenAI-compatible endpoints.
///
/// Holds one pooled `reqwest::Client`; clones share the pool, so one
/// instance serves every concurrent request.
#[derive(Debug, Clone)]
pub struct OpenAiClient
{   api_key: String
  , api_base: String
  , model: String
  , temperature: f32
  , max_tokens: usize
  , http_client: reqwest::Client
}

impl OpenAiClient
{   /// Build a client; fails fast when no API key is configured
    pub fn new(
      config: &crate::config::ProviderConfig
    ) -> Result<Self, crate::error::Error>
    {   debug!("Creating OpenAiClient for model: {}", config.model);
        let api_key = config.api_key.clone()
          .ok_or_else(|| {
            error!("No API key configured for OpenAI");
            crate::error::Error::MissingApiKey(
              "OpenAI (OPENAI_API_KEY)".to_string()
            )
          })?;

        let http_client = reqwest::Client::builder()
          .timeout(Duration::from_secs(config.timeout_secs))
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            crate::error::Error::HttpError(e.to_string())
          })?;

        Ok(OpenAiClient
        {   api_key
          , api_base: config.api_base.clone()
          , model: config.model.clone()
          , temperature: config.temperature
          , max_tokens: config.max_tokens
          , http_client
        })
    }

    pub fn model(&self) -> &str
    {   &self.model
    }

    fn build_request(
      &self
    , prompt: &str
    , temperature: f32
    , max_tokens: usize
    ) -> ChatRequest
    {   ChatRequest
        {   model: self.model.clone()
          , messages: vec![
              ChatMessage::system(crate::prompt::SYSTEM_INSTRUCTION)
            , ChatMessage::user(prompt)
            ]
          , temperature
          , max_tokens
        }
    }

    /// One chat-completion round trip, with typed failures
    pub async fn complete(
      &self
    , prompt: &str
    , temperature: f32
    , max_tokens: usize
    ) -> Result<String, crate::error::Error>
    {   let request = self.build_request(prompt, temperature, max_tokens);
        trace!(
          "OpenAI request: model={} prompt_len={} temperature={} max_tokens={}"
        , request.model
        , prompt.len()
        , temperature
        , max_tokens
        );

        let response = self.http_client
          .post(format!("{}/chat/completions", self.api_base))
          .header("Authorization", format!("Bearer {}", self.api_key))
          .header("Content-Type", "application/json")
          .json(&request)
          .send()
          .await
          .map_err(|e| {
            if e.is_timeout()
            {   error!("OpenAI request timed out: {}", e);
                crate::error::Error::Timeout
            } else
            {   error!("HTTP error: {}", e);
                crate::error::Error::HttpError(e.to_string())
            }
          })?;

        let status = response.status();
        trace!("OpenAI response status: {}", status);

        // Only the status line is relayed; the body goes to the log
        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!(
              "OpenAI API error {}: {}"
            , status
            , truncate(&error_text, MAX_LOGGED_ERROR_CHARS)
            );
            return Err(crate::error::Error::ApiError(status.to_string()));
        }

        let chat_response: ChatResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        chat_response.choices.into_iter()
          .next()
          .map(|c| {
            trace!("OpenAI finish_reason: {:?}", c.finish_reason);
            c.message.content
          })
          .ok_or_else(|| {
            error!("No choices in response");
            crate::error::Error::NoChoicesInResponse
          })
    }
}

#[async_trait::async_trait]
impl super::Provider for OpenAiClient
{   async fn generate(
      &self
    , prompt: &str
    , temperature: f32
    , max_tokens: usize
    ) -> super::ProviderReply
    {   self.complete(prompt, temperature, max_tokens).await.into()
    }

    async fn generate_default(&self, prompt: &str) -> super::ProviderReply
    {   self.complete(prompt, self.temperature, self.max_tokens)
          .await
          .into()
    }

    fn name(&self) -> &str
    {   "openai"
    }
}
