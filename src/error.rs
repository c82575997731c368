//! Error types for the report pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline failures. Every variant aborts the run before a report is written.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required credential is missing
    #[error("Configuration error: {0}")]
    Config(String),

    /// Topic source returned a non-success code or a malformed body
    #[error("Topic fetch failed: {0}")]
    Fetch(String),

    /// Every extraction attempt failed
    #[error("Idea extraction failed after {attempts} attempt(s): {message}")]
    Extraction { attempts: u32, message: String },

    /// Artifact or automation output file could not be written
    #[error("Write failed for {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single call-and-parse attempt against the text generator failed.
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API returned empty content")]
    EmptyContent,

    #[error("first content block is not text: {0}")]
    NonTextContent(String),

    #[error("API returned empty text")]
    EmptyText,

    #[error("could not extract a JSON array from the response")]
    UnparseableJson,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_message_names_attempts() {
        let err = PipelineError::Extraction {
            attempts: 3,
            message: AttemptError::UnparseableJson.to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Idea extraction failed after 3 attempt(s): could not extract a JSON array from the response"
        );
    }

    #[test]
    fn test_write_error_keeps_source() {
        let err = PipelineError::Write {
            path: PathBuf::from("reports/x.html"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("reports/x.html"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
