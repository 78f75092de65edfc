use std::fmt;

use crate::AnalysisError;

/// Maximum number of characters of the underlying error kept in a generic
/// failure message.
pub const ERROR_EXCERPT_LEN: usize = 100;

const PERMISSION_MARKERS: &[&str] = &["403", "PERMISSION_DENIED"];
const UNAVAILABLE_MARKERS: &[&str] = &["503", "UNAVAILABLE"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCategory {
    NoResponse,
    PermissionDenied,
    Unavailable,
    Generic { excerpt: String },
}

impl FailureCategory {
    /// Derives the category from the text of an underlying error.
    pub fn from_message(message: &str) -> Self {
        if PERMISSION_MARKERS.iter().any(|marker| message.contains(marker)) {
            return FailureCategory::PermissionDenied;
        }
        if UNAVAILABLE_MARKERS.iter().any(|marker| message.contains(marker)) {
            return FailureCategory::Unavailable;
        }
        FailureCategory::Generic {
            excerpt: excerpt(message, ERROR_EXCERPT_LEN),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            FailureCategory::NoResponse => {
                "No response was received from the analysis service. Please try again.".to_string()
            }
            FailureCategory::PermissionDenied => {
                "Permission denied: check that the API key is valid and has access to the model."
                    .to_string()
            }
            FailureCategory::Unavailable => {
                "The analysis service is temporarily unavailable. Please try again in a moment."
                    .to_string()
            }
            FailureCategory::Generic { excerpt } => format!("Analysis failed: {excerpt}"),
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCategory::NoResponse => write!(f, "no response"),
            FailureCategory::PermissionDenied => write!(f, "permission denied"),
            FailureCategory::Unavailable => write!(f, "service unavailable"),
            FailureCategory::Generic { .. } => write!(f, "generic failure"),
        }
    }
}

pub fn categorize(error: &AnalysisError) -> FailureCategory {
    match error {
        AnalysisError::EmptyResponse => FailureCategory::NoResponse,
        other => FailureCategory::from_message(&other.to_string()),
    }
}

fn excerpt(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}
