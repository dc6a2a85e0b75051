pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod prompt;
pub mod auth;
pub mod server;

/*

revue: a small async HTTP backend that forwards code snippets to an
LLM chat-completion API and relays the generated review back to the
caller, behind a static bearer token.

revue/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports
│   ├── main.rs         # Binary: logging, .env, config, serve
│   ├── error.rs        # Error enum and HTTP error body
│   ├── config.rs       # Server and provider configuration
│   ├── request.rs      # Submission and response shapes
│   ├── prompt.rs       # Review and suggestions templates
│   ├── auth.rs         # Bearer-token gate (middleware)
│   ├── server.rs       # Router, handlers, serve loop
│   └── providers/
│       ├── mod.rs      # Provider trait and ProviderReply
│       └── openai.rs   # OpenAI chat-completion client
└── tests/              # Router and provider integration tests

*/

pub use error::{Error, ErrorBody};
pub use config::{Config, ProviderConfig};
pub use providers::{OpenAiClient, Provider, ProviderReply};
pub use request::{
  CodeReviewResponse
, CodeSubmission
, ImprovementSuggestionsResponse
};
pub use server::{create_router, serve, AppState};
