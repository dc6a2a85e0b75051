//! LLM provider implementations

pub mod openai;

// Re-export for convenience
pub use openai::OpenAiClient;

/// Prefix of every failure message relayed in place of generated text
pub const FAILURE_PREFIX: &str = "AI model error: ";

/// Outcome of a single provider call.
///
/// Failures are carried as text rather than raised: handlers relay
/// `Failed` to the caller with a 200 status, same as `Generated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderReply
{   /// Content produced by the model
    Generated(String)
  , /// Transport, status or decoding failure, already formatted
    Failed(String)
}

impl ProviderReply
{   /// Wrap any provider error into its relayed message
    pub fn failed(err: &crate::error::Error) -> Self
    {   ProviderReply::Failed(format!("{}{}", FAILURE_PREFIX, err))
    }

    pub fn is_failed(&self) -> bool
    {   matches!(self, ProviderReply::Failed(_))
    }

    /// The string handed back to the API caller
    pub fn into_text(self) -> String
    {   match self
        {   ProviderReply::Generated(text)
          | ProviderReply::Failed(text) => text
        }
    }
}

impl From<Result<String, crate::error::Error>> for ProviderReply
{   fn from(res: Result<String, crate::error::Error>) -> Self
    {   match res
        {   Ok(text) => ProviderReply::Generated(text)
          , Err(e) => ProviderReply::failed(&e)
        }
    }
}

/// A chat-completion backend the endpoints can call
#[async_trait::async_trait]
pub trait Provider: Send + Sync
{   /// Send one prompt; never fails, see [`ProviderReply`]
    async fn generate(
      &self
    , prompt: &str
    , temperature: f32
    , max_tokens: usize
    ) -> ProviderReply;

    /// `generate` with the provider's configured sampling defaults
    async fn generate_default(&self, prompt: &str) -> ProviderReply
    {   self.generate(
          prompt
        , crate::config::DEFAULT_TEMPERATURE
        , crate::config::DEFAULT_MAX_TOKENS
        ).await
    }

    /// Provider name for logs
    fn name(&self) -> &str;
}
