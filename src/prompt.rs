//! Prompt templates sent to the provider

/// System instruction that precedes every prompt
pub const SYSTEM_INSTRUCTION: &str = "You are an expert code reviewer.";

const RULE: &str = "-----------------";

/// Prompt asking for a review of the snippet
pub fn review_prompt(sub: &crate::request::CodeSubmission) -> String
{   format!(
      "Please review the following {} code:\n{}\n{}\n{}\nIdentify any issues, improvements, or best practices."
    , sub.language, RULE, sub.code, RULE
    )
}

/// Prompt asking for concrete improvements to the snippet
pub fn suggestions_prompt(
  sub: &crate::request::CodeSubmission
) -> String
{   format!(
      "Suggest concrete improvements to the following {} code, explain why each is needed:\n{}\n{}\n{}"
    , sub.language, RULE, sub.code, RULE
    )
}
