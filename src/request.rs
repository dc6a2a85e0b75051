//! Request and response shapes for the review API

use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "plaintext";

fn default_language() -> String
{   DEFAULT_LANGUAGE.to_string()
}

/// Code snippet submitted for review or suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSubmission
{   /// The code snippet, kept verbatim
    pub code: String
  , /// Programming language of the code
    #[serde(default = "default_language")]
    pub language: String
}

impl CodeSubmission
{   pub fn new(
      code: impl Into<String>
    , language: impl Into<String>
    ) -> Self
    {   CodeSubmission
        {   code: code.into()
          , language: language.into()
        }
    }

    /// Reject submissions whose code or language is blank
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if self.code.trim().is_empty()
          || self.language.trim().is_empty()
        {   return Err(crate::error::Error::BadRequest(
              "Both code and language are required.".to_string()
            ));
        }
        Ok(())
    }
}

/// Body of a successful POST /api/review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeReviewResponse
{   pub review: String
}

/// Body of a successful POST /api/suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementSuggestionsResponse
{   pub suggestions: String
}

/// Body of GET /health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse
{   pub message: String
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn missing_language_defaults_to_plaintext()
    {   let sub: CodeSubmission
          = serde_json::from_str(r#"{"code":"print(1)"}"#).unwrap();
        assert_eq!(sub.language, "plaintext");
        assert!(sub.validate().is_ok());
    }

    #[test]
    fn blank_fields_are_bad_requests()
    {   for (code, language) in [
          ("", "py")
        , ("   \n\t", "py")
        , ("x", "")
        , ("x", "  ")
        ]
        {   let err = CodeSubmission::new(code, language)
              .validate()
              .unwrap_err();
            assert_eq!(
              err
            , crate::error::Error::BadRequest(
                "Both code and language are required.".into()
              )
            );
        }
    }

    #[test]
    fn validation_does_not_alter_values()
    {   let sub = CodeSubmission::new("  fn main() {}\n", " rust ");
        assert!(sub.validate().is_ok());
        assert_eq!(sub.code, "  fn main() {}\n");
        assert_eq!(sub.language, " rust ");
    }

    #[test]
    fn missing_code_fails_to_decode()
    {   let res: Result<CodeSubmission, _>
          = serde_json::from_str(r#"{"language":"py"}"#);
        assert!(res.is_err());
    }
}
