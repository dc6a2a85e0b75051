//! Configuration for the server and the upstream provider

use serde::{Deserialize, Serialize};
use log::{debug, warn};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 40;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_TOKENS: usize = 512;

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig
{   /// API key sent as the outbound bearer credential
    pub api_key: Option<String>
  , /// API base URL, without the trailing endpoint path
    pub api_base: String
  , /// Model name
    pub model: String
  , /// Request timeout in seconds
    pub timeout_secs: u64
  , /// Sampling temperature used when the caller gives none
    pub temperature: f32
  , /// Generation cap used when the caller gives none
    pub max_tokens: usize
}

impl Default for ProviderConfig
{   fn default() -> Self
    {   ProviderConfig
        {   api_key: None
          , api_base: DEFAULT_API_BASE.to_string()
          , model: DEFAULT_MODEL.to_string()
          , timeout_secs: DEFAULT_TIMEOUT_SECS
          , temperature: DEFAULT_TEMPERATURE
          , max_tokens: DEFAULT_MAX_TOKENS
        }
    }
}

/// Server configuration, built once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config
{   /// Socket address the server listens on
    pub bind_addr: String
  , /// Shared secret expected in inbound bearer tokens
    pub auth_token: Option<String>
  , /// Upstream provider configuration
    pub provider: ProviderConfig
}

impl Default for Config
{   fn default() -> Self
    {   Config
        {   bind_addr: DEFAULT_BIND_ADDR.to_string()
          , auth_token: None
          , provider: ProviderConfig::default()
        }
    }
}

impl Config
{   /// Build from the process environment
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F)
      -> Result<Self, crate::error::Error>
    where F: Fn(&str) -> Option<String>
    {   let get = |key: &str| {
          lookup(key).filter(|v| !v.trim().is_empty())
        };
        let defaults = ProviderConfig::default();

        let timeout_secs = match get("OPENAI_TIMEOUT_SECS")
        {   Some(raw) => raw.trim().parse::<u64>()
              .map_err(|e| {
                crate::error::Error::InvalidConfiguration(
                  format!("OPENAI_TIMEOUT_SECS={}: {}", raw, e)
                )
              })?
          , None => defaults.timeout_secs
        };
        if timeout_secs == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "OPENAI_TIMEOUT_SECS must be at least 1".to_string()
            ));
        }

        let config = Config
        {   bind_addr: get("BIND_ADDR")
              .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
          , auth_token: get("API_AUTH_TOKEN")
          , provider: ProviderConfig
            {   api_key: get("OPENAI_API_KEY")
              , api_base: get("OPENAI_API_BASE")
                  .map(|b| b.trim_end_matches('/').to_string())
                  .unwrap_or(defaults.api_base)
              , model: get("OPENAI_MODEL")
                  .unwrap_or(defaults.model)
              , timeout_secs
              , temperature: defaults.temperature
              , max_tokens: defaults.max_tokens
            }
        };

        if config.auth_token.is_none()
        {   warn!(
              "API_AUTH_TOKEN is not set; protected routes will reject every request"
            );
        }
        debug!(
          "Loaded config: bind_addr={} model={} api_base={}"
        , config.bind_addr
        , config.provider.model
        , config.provider.api_base
        );
        Ok(config)
    }
}
