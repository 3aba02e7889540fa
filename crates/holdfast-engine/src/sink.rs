//! Structured events emitted by the executor.
//!
//! The executor never logs directly; it reports to the [`EventSink`] it was
//! built with. [`TracingSink`] forwards to `tracing`, [`MemorySink`] keeps
//! events for assertions.

use holdfast_common::formatter::format_intent;
use holdfast_common::intent::Intent;
use holdfast_common::locator::LocatorCandidate;
use holdfast_common::result::AttemptFailure;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    IntentStarted {
        intent: Intent,
        candidates: usize,
    },
    /// The alias lookup ran against the live page.
    RoleLabelResolved {
        requested: String,
        label: String,
        value: String,
        listed: bool,
    },
    RevealSkipped,
    RevealOpened {
        candidate: LocatorCandidate,
    },
    RevealFailed {
        tried: usize,
    },
    CandidateFailed {
        intent: Intent,
        index: usize,
        candidate: LocatorCandidate,
        failure: AttemptFailure,
    },
    CandidateSucceeded {
        intent: Intent,
        index: usize,
        candidate: LocatorCandidate,
    },
    /// Rendered texts closest to a requested one, logged when nothing matched.
    ClosestTexts {
        wanted: String,
        closest: Vec<String>,
    },
    IntentExhausted {
        intent: Intent,
        attempts: usize,
        artifact: Option<PathBuf>,
    },
    ArtifactFailed {
        message: String,
    },
}

pub trait EventSink: Send + Sync {
    fn record(&self, event: ExecutionEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: ExecutionEvent) {
        match event {
            ExecutionEvent::IntentStarted { intent, candidates } => {
                info!(intent = %format_intent(&intent), candidates, "executing intent");
            }
            ExecutionEvent::RoleLabelResolved {
                requested,
                label,
                value,
                listed,
            } => {
                if listed {
                    info!(%requested, %label, %value, "role label resolved");
                } else {
                    warn!(
                        %requested,
                        "role has no alias entry; using its name as label and value"
                    );
                }
            }
            ExecutionEvent::RevealSkipped => debug!("options already visible"),
            ExecutionEvent::RevealOpened { candidate } => {
                info!(trigger = %candidate.describe(), "dropdown opened");
            }
            ExecutionEvent::RevealFailed { tried } => {
                warn!(tried, "no dropdown trigger worked");
            }
            ExecutionEvent::CandidateFailed {
                intent,
                index,
                candidate,
                failure,
            } => {
                debug!(
                    intent = %intent,
                    candidate = index + 1,
                    strategy = %candidate.describe(),
                    %failure,
                    "candidate failed"
                );
            }
            ExecutionEvent::CandidateSucceeded {
                intent,
                index,
                candidate,
            } => {
                info!(
                    intent = %intent,
                    candidate = index + 1,
                    strategy = %candidate.describe(),
                    "candidate matched"
                );
            }
            ExecutionEvent::ClosestTexts { wanted, closest } => {
                info!(%wanted, closest = ?closest, "closest rendered texts");
            }
            ExecutionEvent::IntentExhausted {
                intent,
                attempts,
                artifact,
            } => {
                warn!(
                    intent = %intent,
                    attempts,
                    artifact = ?artifact,
                    "all candidates failed"
                );
            }
            ExecutionEvent::ArtifactFailed { message } => {
                warn!(%message, "could not capture diagnostic artifact");
            }
        }
    }
}

/// Keeps every event in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ExecutionEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ExecutionEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: ExecutionEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
