//! Content validation rules applied to every uploaded file.

/// Keyword every accepted file must contain, compared case-insensitively.
pub const REQUIRED_KEYWORD: &str = "job_id";

pub const MSG_EMPTY: &str = "File is empty";
pub const MSG_MISSING_KEYWORD: &str = "Content missing 'job_id' keyword";
pub const MSG_VALID: &str = "Valid";

/// Verdict for one file. Rejection is an ordinary outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub message: String,
}

impl ValidationOutcome {
    pub fn accept(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
        }
    }

    pub fn reject(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Decides whether decoded file content is acceptable.
///
/// Implementations must be pure: same input, same outcome, no I/O.
pub trait ContentValidator: Send + Sync {
    fn validate(&self, content: &str) -> ValidationOutcome;
}

/// Accepts non-empty content that mentions `job_id` in any letter case.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordValidator;

impl ContentValidator for KeywordValidator {
    fn validate(&self, content: &str) -> ValidationOutcome {
        if content.is_empty() {
            return ValidationOutcome::reject(MSG_EMPTY);
        }

        if !content.to_lowercase().contains(REQUIRED_KEYWORD) {
            return ValidationOutcome::reject(MSG_MISSING_KEYWORD);
        }

        ValidationOutcome::accept(MSG_VALID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_rejected() {
        let outcome = KeywordValidator.validate("");
        assert!(!outcome.is_valid);
        assert_eq!(outcome.message, "File is empty");
    }

    #[test]
    fn test_missing_keyword_rejected() {
        let outcome = KeywordValidator.validate("name,amount\nfoo,3\n");
        assert!(!outcome.is_valid);
        assert_eq!(outcome.message, "Content missing 'job_id' keyword");
    }

    #[test]
    fn test_keyword_any_case_accepted() {
        for content in ["{\"job_id\": 1}", "JOB_ID=7", "header Job_Id here"] {
            let outcome = KeywordValidator.validate(content);
            assert!(outcome.is_valid, "{content}");
            assert_eq!(outcome.message, "Valid");
        }
    }

    #[test]
    fn test_pascal_case_jobid_alone_is_not_the_keyword() {
        // `JobId` lower-cases to `jobid`, which lacks the underscore.
        let outcome = KeywordValidator.validate("{\"JobId\": \"J1\"}");
        assert!(!outcome.is_valid);
    }

    #[test]
    fn test_whitespace_only_is_not_empty() {
        let outcome = KeywordValidator.validate("   ");
        assert_eq!(outcome.message, "Content missing 'job_id' keyword");
    }

    #[test]
    fn test_deterministic() {
        let content = "some job_id text";
        assert_eq!(
            KeywordValidator.validate(content),
            KeywordValidator.validate(content)
        );
    }
}
