use super::association::{AssociationResult, find_associated_control};
use crate::backend::{Backend, BackendError};
use holdfast_common::locator::{Requirement, Strategy};
use holdfast_common::matching::{contains_ignore_case, exact_match, fuzzy_match};
use holdfast_common::protocol::ElementSnapshot;
use holdfast_common::result::AttemptFailure;
use std::time::Duration;
use tokio::time::Instant;

/// Selector for everything a `label=` candidate may resolve to.
pub const FORM_CONTROLS: &str = "input, select, textarea";

/// Outcome of evaluating a strategy once against the current page.
#[derive(Debug, Clone)]
pub struct Probe {
    pub found: Option<ElementSnapshot>,
    /// What the page showed, for the attempt log when nothing qualifies.
    pub observed: String,
}

impl Probe {
    fn found(element: ElementSnapshot) -> Self {
        Self {
            found: Some(element),
            observed: String::new(),
        }
    }

    fn missing(observed: impl Into<String>) -> Self {
        Self {
            found: None,
            observed: observed.into(),
        }
    }
}

pub fn satisfies(element: &ElementSnapshot, requirement: Requirement) -> bool {
    match requirement {
        Requirement::Present => true,
        Requirement::Visible => element.visible,
        Requirement::Actionable => element.is_actionable(),
    }
}

/// Text lookups also match every container around the text. The smallest
/// box is the element that carries it.
fn innermost_first(mut matches: Vec<ElementSnapshot>) -> Vec<ElementSnapshot> {
    matches.sort_by(|a, b| {
        let area_a = a.rect.width * a.rect.height;
        let area_b = b.rect.width * b.rect.height;
        area_a
            .partial_cmp(&area_b)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches
}

fn pick(matches: Vec<ElementSnapshot>, requirement: Requirement) -> Probe {
    let total = matches.len();
    match matches.into_iter().find(|e| satisfies(e, requirement)) {
        Some(element) => Probe::found(element),
        None if total == 0 => Probe::missing("no matches"),
        None => Probe::missing(format!(
            "{} match{}, none {}",
            total,
            if total == 1 { "" } else { "es" },
            requirement.describe()
        )),
    }
}

/// Evaluate a strategy once. Never waits.
pub async fn resolve_once<B: Backend + ?Sized>(
    backend: &mut B,
    strategy: &Strategy,
    requirement: Requirement,
) -> Result<Probe, BackendError> {
    match strategy {
        Strategy::Css(selector) => Ok(pick(backend.query(selector).await?, requirement)),

        Strategy::ExactText { scope, text } => {
            let in_scope = backend.query(scope).await?;
            let scanned = in_scope.len();
            let matches: Vec<_> = in_scope
                .into_iter()
                .filter(|e| exact_match(&e.text, text))
                .collect();
            if matches.is_empty() {
                return Ok(Probe::missing(format!(
                    "{} element{} in scope, none with text {:?}",
                    scanned,
                    if scanned == 1 { "" } else { "s" },
                    text
                )));
            }
            Ok(pick(innermost_first(matches), requirement))
        }

        Strategy::Fuzzy { scope, text } => {
            let in_scope = backend.query(scope).await?;
            let scanned = in_scope.len();
            let (exact, loose): (Vec<_>, Vec<_>) = in_scope
                .into_iter()
                .filter(|e| fuzzy_match(&e.text, text))
                .partition(|e| exact_match(&e.text, text));
            if exact.is_empty() && loose.is_empty() {
                return Ok(Probe::missing(format!(
                    "{} element{} in scope, none resembling {:?}",
                    scanned,
                    if scanned == 1 { "" } else { "s" },
                    text
                )));
            }
            // Exact renderings first so "TEST Org" never loses to "TEST Org (old)".
            let ordered = innermost_first(exact)
                .into_iter()
                .chain(innermost_first(loose))
                .collect();
            Ok(pick(ordered, requirement))
        }

        Strategy::Nth { scope, index } => {
            let mut in_scope = backend.query(scope).await?;
            if *index >= in_scope.len() {
                return Ok(Probe::missing(format!(
                    "only {} match{}",
                    in_scope.len(),
                    if in_scope.len() == 1 { "" } else { "es" }
                )));
            }
            let element = in_scope.swap_remove(*index);
            if satisfies(&element, requirement) {
                Ok(Probe::found(element))
            } else {
                Ok(Probe::missing(format!(
                    "element at position {} is not {}",
                    index,
                    requirement.describe()
                )))
            }
        }

        Strategy::Label(text) => {
            let labels: Vec<_> = backend
                .query("label")
                .await?
                .into_iter()
                .filter(|l| contains_ignore_case(&l.text, text))
                .collect();
            if labels.is_empty() {
                return Ok(Probe::missing(format!("no label containing {:?}", text)));
            }

            let controls = backend.query(FORM_CONTROLS).await?;
            for label in &labels {
                if let AssociationResult::Found(id) =
                    find_associated_control(label, &controls, requirement)
                    && let Some(control) = controls.iter().find(|c| c.id == id)
                {
                    return Ok(Probe::found(control.clone()));
                }
            }
            Ok(Probe::missing(format!(
                "{} label{} found, no associated control {}",
                labels.len(),
                if labels.len() == 1 { "" } else { "s" },
                requirement.describe()
            )))
        }
    }
}

/// Poll a strategy until it yields an element or `timeout` elapses.
///
/// Query errors that cannot clear up by waiting (bad selector, dead session)
/// fail the attempt immediately; anything else is treated as "not yet".
pub async fn resolve_within<B: Backend + ?Sized>(
    backend: &mut B,
    strategy: &Strategy,
    requirement: Requirement,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<ElementSnapshot, AttemptFailure> {
    let start = Instant::now();
    loop {
        let last_seen = match resolve_once(backend, strategy, requirement).await {
            Ok(Probe {
                found: Some(element),
                ..
            }) => return Ok(element),
            Ok(probe) => probe.observed,
            Err(e @ (BackendError::SelectorInvalid { .. } | BackendError::NotReady)) => {
                return Err(AttemptFailure::Query {
                    message: e.to_string(),
                });
            }
            Err(e) => format!("query error: {}", e),
        };

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(AttemptFailure::ResolutionTimeout {
                waited_ms: elapsed.as_millis() as u64,
                last_seen,
            });
        }
        tokio::time::sleep(poll_interval.min(timeout - elapsed)).await;
    }
}
