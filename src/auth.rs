//! Bearer-token gate for the protected routes

use std::sync::Arc;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use log::{debug, warn};
use subtle::ConstantTimeEq;

pub const BEARER_PREFIX: &str = "Bearer ";

const MISSING_MESSAGE: &str = "Missing or invalid authorization header.";
const INVALID_MESSAGE: &str = "Forbidden: Invalid token.";

/// Decide access for a raw `Authorization` header value.
///
/// The header is taken as bytes so a non-ASCII token still counts as
/// well-formed. `Unauthorized` covers an unset secret, a missing header
/// and a header without the `Bearer ` scheme. `Forbidden` is only
/// returned for a well-formed token that does not match.
pub fn check_bearer(
  header: Option<&[u8]>
, expected: Option<&str>
) -> Result<(), crate::error::Error>
{   let expected = match expected.filter(|s| !s.is_empty())
    {   Some(secret) => secret
      , None => {
          warn!("Rejecting request: no auth token configured");
          return Err(crate::error::Error::Unauthorized(
            MISSING_MESSAGE.to_string()
          ));
        }
    };

    let token = match header
      .and_then(|h| h.strip_prefix(BEARER_PREFIX.as_bytes()))
    {   Some(rest) => rest.trim_ascii()
      , None => {
          debug!("Rejecting request: missing or malformed credential");
          return Err(crate::error::Error::Unauthorized(
            MISSING_MESSAGE.to_string()
          ));
        }
    };

    if token.ct_eq(expected.as_bytes()).unwrap_u8() != 1
    {   debug!("Rejecting request: token mismatch");
        return Err(crate::error::Error::Forbidden(
          INVALID_MESSAGE.to_string()
        ));
    }

    Ok(())
}

/// Middleware stage run ahead of every protected handler
pub async fn require_auth(
  State(state): State<Arc<crate::server::AppState>>
, request: Request
, next: Next
) -> Result<Response, crate::error::Error>
{   let header = request.headers()
      .get(AUTHORIZATION)
      .map(|v| v.as_bytes());
    check_bearer(header, state.auth_token.as_deref())?;
    Ok(next.run(request).await)
}
