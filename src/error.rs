use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, DocError>;

/// Errors that can occur while generating documentation for a repository
#[derive(Debug, Error)]
pub enum DocError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal errors
    #[error("Walkdir error: {0}")]
    Walkdir(#[from] walkdir::Error),

    /// Configuration file parsing errors
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// No credential for the model endpoint was supplied
    #[error("No API key provided. Set OPENAI_API_KEY or pass --api-key")]
    MissingApiKey,

    /// Repository acquisition errors
    #[error("Clone error: {0}")]
    Clone(String),

    /// The model endpoint answered with an error or an unusable completion
    #[error("Model error: {0}")]
    Model(String),

    /// A named document could not be generated
    #[error("Failed to generate {document}: {source}")]
    Generation {
        /// Name of the document being generated
        document: String,
        /// Underlying failure
        #[source]
        source: Box<DocError>,
    },

    /// Writing the documentation tree failed
    #[error("Failed to publish {}: {source}", path.display())]
    Publish {
        /// File or directory being written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// General message errors
    #[error("{0}")]
    Message(String),
}

impl DocError {
    /// Wraps an error raised while producing the named document
    pub fn generation(document: impl Into<String>, source: DocError) -> Self {
        Self::Generation {
            document: document.into(),
            source: Box::new(source),
        }
    }

    /// Wraps an I/O error raised while writing `path`
    pub fn publish(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Publish {
            path: path.into(),
            source,
        }
    }

    /// Checks if this error looks transient (network or endpoint trouble).
    ///
    /// Only used to word log messages; the model client retries every failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Model(_) | Self::IO(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transient() {
        let transient = DocError::Model("503 Service Unavailable".into());
        let fatal = DocError::Config("temperature must be between 0 and 2".into());

        assert!(transient.is_transient());
        assert!(!fatal.is_transient());
    }

    #[test]
    fn test_generation_error_names_document() {
        let err = DocError::generation("installation guide", DocError::Model("boom".into()));
        assert_eq!(
            err.to_string(),
            "Failed to generate installation guide: Model error: boom"
        );
    }
}
