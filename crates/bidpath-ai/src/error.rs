use thiserror::Error;

use crate::backend::BackendError;
use crate::stages::Stage;

/// Failure of a single stage call.
///
/// Transport errors, unparseable output, and output that does not fit the
/// stage contract are all reported through this one type. Nothing is
/// retried or repaired.
#[derive(Error, Debug)]
pub enum GenerationFailure {
    #[error("generation backend failed: {0}")]
    Backend(#[from] BackendError),

    #[error("backend output is not valid JSON: {source}")]
    Malformed {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{stage} output does not match its contract: {source}")]
    Shape {
        stage: Stage,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode stage payload: {0}")]
    Payload(#[source] serde_json::Error),
}

impl GenerationFailure {
    /// Backend text that failed to parse, when there was any.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Malformed { raw, .. } | Self::Shape { raw, .. } => Some(raw),
            Self::Backend(_) | Self::Payload(_) => None,
        }
    }
}
