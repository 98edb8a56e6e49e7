#[derive(Debug, thiserror::Error)]
pub enum QaError {
    /// A required secret is unset or empty. Fatal; callers do not catch this.
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The request never produced a usable response (connect, timeout, body decode).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote service answered with a non-success status.
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Malformed or mismatched evaluator input.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, QaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QaError::MissingCredential("OPENAI_API_KEY".to_string());
        assert_eq!(err.to_string(), "Missing credential: OPENAI_API_KEY is not set");

        let err = QaError::Service { status: 503, message: "unavailable".to_string() };
        assert_eq!(err.to_string(), "Service error (503): unavailable");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let qa_err: QaError = io_err.into();
        assert!(matches!(qa_err, QaError::Io(_)));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert_eq!(ok_result.unwrap(), 42);

        let err_result: Result<i32> = Err(QaError::Config("invalid".to_string()));
        assert!(err_result.is_err());
    }
}
