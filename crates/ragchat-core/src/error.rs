//! Error types for the ragchat service.

use thiserror::Error;

/// Result type alias using RagChatError.
pub type Result<T> = std::result::Result<T, RagChatError>;

/// Errors that can occur in the ragchat service.
#[derive(Error, Debug)]
pub enum RagChatError {
    /// Invalid chunker or service configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// A required API credential is not set.
    #[error("Missing credential: {name} not found in config or environment")]
    MissingCredential { name: String },

    /// Vector index not found.
    #[error("Index not found: {name}")]
    IndexNotFound { name: String },

    /// Uploaded document cannot be ingested.
    #[error("Unsupported document '{name}': {reason}")]
    UnsupportedDocument { name: String, reason: String },

    /// Embedding API error.
    #[error("Embedding error: {message}")]
    Embedding { message: String },

    /// Vector index API error.
    #[error("Vector index error: {message}")]
    VectorIndex { message: String },

    /// Chat completion API error.
    #[error("Chat error: {message}")]
    Chat { message: String },

    /// HTTP transport error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Internal error (unexpected).
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RagChatError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a missing credential error.
    pub fn missing_credential(name: impl Into<String>) -> Self {
        Self::MissingCredential { name: name.into() }
    }

    /// Create an embedding error.
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create a vector index error.
    pub fn vector_index(message: impl Into<String>) -> Self {
        Self::VectorIndex {
            message: message.into(),
        }
    }

    /// Create a chat error.
    pub fn chat(message: impl Into<String>) -> Self {
        Self::Chat {
            message: message.into(),
        }
    }

    /// Create an HTTP transport error.
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the stable error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            Self::MissingCredential { .. } => "MISSING_CREDENTIAL",
            Self::IndexNotFound { .. } => "INDEX_NOT_FOUND",
            Self::UnsupportedDocument { .. } => "UNSUPPORTED_DOCUMENT",
            Self::Embedding { .. } => "EMBEDDING_ERROR",
            Self::VectorIndex { .. } => "VECTOR_INDEX_ERROR",
            Self::Chat { .. } => "CHAT_ERROR",
            Self::Http { .. } => "HTTP_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RagChatError::IndexNotFound {
            name: "ragchat-index".to_string(),
        };
        assert!(err.to_string().contains("ragchat-index"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            RagChatError::invalid_configuration("overlap too large").error_code(),
            "INVALID_CONFIGURATION"
        );
        assert_eq!(
            RagChatError::missing_credential("OPENAI_API_KEY").error_code(),
            "MISSING_CREDENTIAL"
        );
        assert_eq!(
            RagChatError::embedding("test").error_code(),
            "EMBEDDING_ERROR"
        );
    }
}
