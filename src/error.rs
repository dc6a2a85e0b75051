use std::collections::HashMap;
use std::fmt;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, debug};

/// Custom error type for revue operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Credential header absent, malformed, or no secret configured
    Unauthorized(String)
  , /// Well-formed credential that does not match the secret
    Forbidden(String)
  , /// Submission failed field validation
    BadRequest(String)
  , /// Request body could not be decoded into a submission
    UnprocessableEntity(String)
  , /// Body refused before decoding (size, content type), with its status
    BodyRejected(u16, String)
  , /// API key is missing for the provider
    MissingApiKey(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// HTTP request error
    HttpError(String)
  , /// API returned an error response
    ApiError(String)
  , /// Failed to parse API response
    ParseError(String)
  , /// No choices in API response
    NoChoicesInResponse
  , /// Timeout error
    Timeout
  , /// Generic error
    Other(String)
}

impl Error
{   /// HTTP status this error maps to when it reaches a handler
    pub fn status_code(&self) -> StatusCode
    {   match self
        {   Error::Unauthorized(_) => StatusCode::UNAUTHORIZED
          , Error::Forbidden(_) => StatusCode::FORBIDDEN
          , Error::BadRequest(_) => StatusCode::BAD_REQUEST
          , Error::UnprocessableEntity(_) => {
              StatusCode::UNPROCESSABLE_ENTITY
            }
          , Error::BodyRejected(code, _) => {
              StatusCode::from_u16(*code)
                .unwrap_or(StatusCode::BAD_REQUEST)
            }
          , _ => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Message placed in the error body, without the Display prefix
    pub fn message(&self) -> String
    {   match self
        {   Error::Unauthorized(msg)
          | Error::Forbidden(msg)
          | Error::BadRequest(msg)
          | Error::BodyRejected(_, msg) => msg.clone()
          , Error::UnprocessableEntity(_) => {
              "The request body is not a valid code submission."
                .to_string()
            }
          , other => other.to_string()
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Unauthorized(msg) => {
              write!(f, "Unauthorized: {}", msg)
            }
          , Error::Forbidden(msg) => {
              write!(f, "Forbidden: {}", msg)
            }
          , Error::BadRequest(msg) => {
              write!(f, "Bad request: {}", msg)
            }
          , Error::UnprocessableEntity(msg) => {
              write!(f, "Unprocessable request body: {}", msg)
            }
          , Error::BodyRejected(code, msg) => {
              write!(f, "Request body rejected ({}): {}", code, msg)
            }
          , Error::MissingApiKey(provider) => {
              write!(f, "Missing API key for: {}", provider)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError(msg) => {
              write!(f, "API error: {}", msg)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::NoChoicesInResponse => {
              write!(f, "API response contained no choices")
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

/// Wire shape of every non-2xx response
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody
{   pub code: u16
  , pub status: String
  , pub message: String
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, serde_json::Value>>
}

impl From<&Error> for ErrorBody
{   fn from(err: &Error) -> Self
    {   let status = err.status_code();
        let errors = match err
        {   Error::UnprocessableEntity(detail) => {
              let mut map = HashMap::new();
              map.insert(
                "json".to_string()
              , serde_json::json!([detail])
              );
              Some(map)
            }
          , _ => None
        };
        ErrorBody
        {   code: status.as_u16()
          , status: status
              .canonical_reason()
              .unwrap_or("Unknown")
              .to_string()
          , message: err.message()
          , errors
        }
    }
}

impl IntoResponse for Error
{   fn into_response(self) -> Response
    {   let status = self.status_code();
        if status.is_server_error()
        {   error!("Request failed: {}", self);
        } else
        {   debug!("Request rejected: {}", self);
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
