//! HTTP routes for code review and improvement suggestions

use std::sync::Arc;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use log::{debug, info, error};
use crate::providers::Provider;
use crate::request::{
  CodeReviewResponse
, CodeSubmission
, HealthResponse
, ImprovementSuggestionsResponse
};

pub const SAMPLE_REVIEW: &str
  = "This is a sample review. Your real reviews will appear here.";

/// Shared, read-only state handed to every handler
pub struct AppState
{   /// Secret expected in inbound bearer tokens
    pub auth_token: Option<String>
  , /// Backend that turns prompts into text
    pub provider: Arc<dyn Provider>
}

impl AppState
{   pub fn new(
      auth_token: Option<String>
    , provider: Arc<dyn Provider>
    ) -> Self
    {   AppState
        {   auth_token
          , provider
        }
    }
}

/// Decode and validate a submission body
fn accept_submission(
  payload: Result<Json<CodeSubmission>, JsonRejection>
) -> Result<CodeSubmission, crate::error::Error>
{   let Json(submission) = payload.map_err(|rejection| {
      match rejection
      {   decode @ (
            JsonRejection::JsonDataError(_)
          | JsonRejection::JsonSyntaxError(_)
          ) => {
            crate::error::Error::UnprocessableEntity(decode.body_text())
          }
        , other => crate::error::Error::BodyRejected(
            other.status().as_u16()
          , other.body_text()
          )
      }
    })?;
    submission.validate()?;
    Ok(submission)
}

async fn review(
  State(state): State<Arc<AppState>>
, payload: Result<Json<CodeSubmission>, JsonRejection>
) -> Result<Json<CodeReviewResponse>, crate::error::Error>
{   let submission = accept_submission(payload)?;
    debug!(
      "Review requested: language={} code_len={}"
    , submission.language
    , submission.code.len()
    );

    let prompt = crate::prompt::review_prompt(&submission);
    let reply = state.provider.generate_default(&prompt).await;
    if reply.is_failed()
    {   error!("Review degraded to error text via {}", state.provider.name());
    }

    Ok(Json(CodeReviewResponse
    {   review: reply.into_text()
    }))
}

async fn suggestions(
  State(state): State<Arc<AppState>>
, payload: Result<Json<CodeSubmission>, JsonRejection>
) -> Result<Json<ImprovementSuggestionsResponse>, crate::error::Error>
{   let submission = accept_submission(payload)?;
    debug!(
      "Suggestions requested: language={} code_len={}"
    , submission.language
    , submission.code.len()
    );

    let prompt = crate::prompt::suggestions_prompt(&submission);
    let reply = state.provider.generate_default(&prompt).await;
    if reply.is_failed()
    {   error!(
          "Suggestions degraded to error text via {}"
        , state.provider.name()
        );
    }

    Ok(Json(ImprovementSuggestionsResponse
    {   suggestions: reply.into_text()
    }))
}

/// Canned payload for client developers
async fn review_test() -> Json<CodeReviewResponse>
{   Json(CodeReviewResponse
    {   review: SAMPLE_REVIEW.to_string()
    })
}

async fn health() -> Json<HealthResponse>
{   Json(HealthResponse
    {   message: "Healthy".to_string()
    })
}

/// Routes under `/api` sit behind the bearer gate; `/health` is public
pub fn create_router(state: Arc<AppState>) -> Router
{   let protected = Router::new()
      .route("/review", post(review))
      .route("/suggestions", post(suggestions))
      .route("/review/test", get(review_test))
      .route_layer(middleware::from_fn_with_state(
        state.clone()
      , crate::auth::require_auth
      ));

    Router::new()
      .nest("/api", protected)
      .route("/health", get(health))
      .with_state(state)
}

/// Build the provider, bind, and serve until ctrl-c
pub async fn serve(
  config: crate::config::Config
) -> Result<(), crate::error::Error>
{   let provider = crate::providers::OpenAiClient::new(&config.provider)?;
    info!(
      "Using provider openai with model {}"
    , provider.model()
    );

    let state = Arc::new(AppState::new(
      config.auth_token.clone()
    , Arc::new(provider)
    ));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str())
      .await
      .map_err(|e| {
        error!("Failed to bind {}: {}", config.bind_addr, e);
        crate::error::Error::InvalidConfiguration(
          format!("cannot bind {}: {}", config.bind_addr, e)
        )
      })?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
      .with_graceful_shutdown(shutdown_signal())
      .await
      .map_err(|e| {
        error!("Server error: {}", e);
        crate::error::Error::Other(e.to_string())
      })?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal()
{   if let Err(e) = tokio::signal::ctrl_c().await
    {   error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
