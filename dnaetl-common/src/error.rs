//! Common error types for the DNA ETL pipeline

use thiserror::Error;

/// Common result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Input descriptor or context directory does not have the required shape
    #[error("Structural input error: {0}")]
    StructuralInput(String),

    /// Parsed metadata failed an age, date-range or string-length constraint
    #[error("Validation failed: {0}")]
    SemanticValidation(String),

    /// Missing expected keys, unparsable dates or otherwise unusable data
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// JSON parse or serialization error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Process exit status for this error category
    ///
    /// Every category maps to a distinct non-zero code. 2 is left to clap,
    /// which exits with it on command-line usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Io(_) => 1,
            Error::StructuralInput(_) => 3,
            Error::SemanticValidation(_) => 4,
            Error::MalformedData(_) | Error::Json(_) => 5,
            Error::Config(_) => 6,
        }
    }
}

/// Exit status clap uses for command-line usage errors
pub const USAGE_EXIT_CODE: i32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_non_zero() {
        let errors = [
            Error::StructuralInput("x".to_string()),
            Error::SemanticValidation("x".to_string()),
            Error::MalformedData("x".to_string()),
            Error::Config("x".to_string()),
            Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "x")),
        ];
        for err in &errors {
            assert_ne!(err.exit_code(), 0, "{} must not exit with 0", err);
        }
    }

    #[test]
    fn test_validation_categories_have_distinct_codes() {
        let structural = Error::StructuralInput("a".to_string()).exit_code();
        let semantic = Error::SemanticValidation("b".to_string()).exit_code();
        let malformed = Error::MalformedData("c".to_string()).exit_code();
        assert_ne!(structural, semantic);
        assert_ne!(semantic, malformed);
        assert_ne!(structural, malformed);
    }

    #[test]
    fn test_exit_codes_distinct_from_usage_error() {
        let errors = [
            Error::StructuralInput("x".to_string()),
            Error::SemanticValidation("x".to_string()),
            Error::MalformedData("x".to_string()),
            Error::Config("x".to_string()),
            Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "x")),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        assert!(!codes.contains(&USAGE_EXIT_CODE));

        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_json_error_is_malformed_data() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.exit_code(), Error::MalformedData(String::new()).exit_code());
    }

    #[test]
    fn test_display_names_failed_check() {
        let err = Error::SemanticValidation("age check failed".to_string());
        assert_eq!(err.to_string(), "Validation failed: age check failed");
    }
}
