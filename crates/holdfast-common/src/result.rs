use crate::intent::Intent;
use crate::locator::LocatorCandidate;
use crate::protocol::ElementId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Why a single candidate did not succeed. Never escapes the executor on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AttemptFailure {
    /// Nothing satisfying the candidate appeared within its bound.
    ResolutionTimeout {
        waited_ms: u64,
        /// What was last observed, e.g. "2 matches, none visible and enabled".
        last_seen: String,
    },
    /// The backend rejected the action on the resolved element.
    ActionFailed { message: String },
    /// The action ran but the page does not show the requested state.
    PostConditionMismatch { expected: String, actual: String },
    /// The backend errored while querying for this candidate.
    Query { message: String },
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResolutionTimeout {
                waited_ms,
                last_seen,
            } => write!(f, "not resolved within {}ms ({})", waited_ms, last_seen),
            Self::ActionFailed { message } => write!(f, "action failed: {}", message),
            Self::PostConditionMismatch { expected, actual } => {
                write!(f, "post-condition failed: expected {}, got {}", expected, actual)
            }
            Self::Query { message } => write!(f, "query failed: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Position in the declared candidate list.
    pub index: usize,
    pub candidate: LocatorCandidate,
    pub failure: AttemptFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedCandidate {
    pub index: usize,
    pub candidate: LocatorCandidate,
    pub element: ElementId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub intent: Intent,
    pub success: bool,
    pub matched: Option<MatchedCandidate>,
    /// Number of candidates attempted.
    pub attempts: usize,
    /// Failed attempts, in declared order.
    pub log: Vec<AttemptRecord>,
    /// Diagnostic artifact written when every candidate failed.
    pub artifact: Option<PathBuf>,
    /// Label clicked for role selection, when it differs from the request.
    pub rendered_label: Option<String>,
}

impl ExecutionResult {
    pub fn succeeded(
        intent: Intent,
        matched: MatchedCandidate,
        log: Vec<AttemptRecord>,
        rendered_label: Option<String>,
    ) -> Self {
        Self {
            intent,
            success: true,
            attempts: log.len() + 1,
            matched: Some(matched),
            log,
            artifact: None,
            rendered_label,
        }
    }

    pub fn exhausted(
        intent: Intent,
        log: Vec<AttemptRecord>,
        artifact: Option<PathBuf>,
        rendered_label: Option<String>,
    ) -> Self {
        Self {
            intent,
            success: false,
            attempts: log.len(),
            matched: None,
            log,
            artifact,
            rendered_label,
        }
    }
}
