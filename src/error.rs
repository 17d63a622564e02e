//! Error types for the similarity engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::Attribute;

pub type Result<T> = std::result::Result<T, SimilarityError>;

/// Errors surfaced to callers of the engine.
///
/// Missing dictionary entries and unknown profile names are not errors; they
/// degrade to a zero sub-score and the `shape` profile respectively.
#[derive(Debug, Error)]
pub enum SimilarityError {
    /// An argument that should hold exactly one character did not.
    #[error("Malformed input: {argument} must be a single character, got {value:?}")]
    MalformedInput {
        argument: &'static str,
        value: String,
    },

    /// A profile needs the embedding signal but no provider was configured.
    #[error("Embedding provider unavailable: profile '{profile}' requires a word-vector similarity provider")]
    EmbeddingUnavailable { profile: String },

    /// The provider itself failed while scoring a pair.
    #[error("Embedding provider '{provider}' failed: {message}")]
    EmbeddingFailed { provider: String, message: String },

    #[error("Unknown attribute dictionary: {0}")]
    UnknownAttribute(String),

    #[error("Failed to read {attribute} dictionary at {path:?}: {source}")]
    DictionaryIo {
        attribute: Attribute,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {attribute} dictionary: {source}")]
    DictionaryFormat {
        attribute: Attribute,
        #[source]
        source: serde_json::Error,
    },

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimilarityError {
    pub fn malformed_input(argument: &'static str, value: impl Into<String>) -> Self {
        Self::MalformedInput {
            argument,
            value: value.into(),
        }
    }

    pub fn embedding_unavailable(profile: impl Into<String>) -> Self {
        Self::EmbeddingUnavailable {
            profile: profile.into(),
        }
    }

    pub fn embedding_failed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingFailed {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_problem() {
        let errors = vec![
            SimilarityError::malformed_input("char1", "我们"),
            SimilarityError::embedding_unavailable("w2v"),
            SimilarityError::embedding_failed("vectors", "dimension mismatch"),
            SimilarityError::UnknownAttribute("radical".into()),
            SimilarityError::invalid_config("code_length must be greater than 0"),
        ];
        let expected = [
            "char1",
            "'w2v'",
            "dimension mismatch",
            "radical",
            "code_length",
        ];

        for (err, needle) in errors.iter().zip(expected.iter()) {
            let display = err.to_string();
            assert!(
                display.contains(needle),
                "Display for {:?} should contain '{}', got: {}",
                err,
                needle,
                display
            );
        }
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SimilarityError = io.into();
        assert!(matches!(err, SimilarityError::Io(_)));
    }
}
