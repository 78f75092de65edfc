use std::fmt;

use leafcheck_core::{AnalysisResult, ItemId};

use crate::{categorize, AnalysisError, FailureCategory, NormalizeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalizing,
    Analyzing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress {
        item_id: ItemId,
        stage: Stage,
    },
    ItemCompleted {
        item_id: ItemId,
        result: Result<AnalysisResult, ItemFailure>,
    },
}

/// Why a single item's pipeline ended without a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemFailure {
    Normalize(NormalizeError),
    Analysis {
        category: FailureCategory,
        error: AnalysisError,
    },
    /// The pipeline task died before producing an outcome.
    Crashed(String),
}

impl ItemFailure {
    pub fn analysis(error: AnalysisError) -> Self {
        ItemFailure::Analysis {
            category: categorize(&error),
            error,
        }
    }

    /// Text shown to the user on the failed item.
    pub fn user_message(&self) -> String {
        match self {
            ItemFailure::Normalize(_) => {
                "The file could not be processed. Please try a different image.".to_string()
            }
            ItemFailure::Analysis { category, .. } => category.user_message(),
            ItemFailure::Crashed(_) => {
                "Something went wrong while processing this file. Please try again.".to_string()
            }
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemFailure::Normalize(err) => write!(f, "normalization failed: {err}"),
            ItemFailure::Analysis { category, error } => write!(f, "{category}: {error}"),
            ItemFailure::Crashed(reason) => write!(f, "pipeline aborted: {reason}"),
        }
    }
}
