//! Post-condition checks run after a candidate's action.
//!
//! A candidate only succeeds once the page shows the requested state. Checks
//! poll up to a bound because controlled inputs and dropdowns update a few
//! frames after the event that changed them.

use crate::backend::Backend;
use holdfast_common::protocol::ElementId;
use holdfast_common::result::AttemptFailure;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum PostCondition {
    /// Nothing to check (plain clicks).
    None,
    /// The acted element's value equals this text exactly.
    ValueEquals(String),
    /// The acted element reports checked.
    Checked,
    /// The acted element is visible.
    Visible,
    /// Some element matching the selector is visible.
    AnyVisible(String),
    /// Some element matching the selector is checked.
    AnyChecked(String),
}

impl PostCondition {
    pub fn describe(&self) -> String {
        match self {
            Self::None => "nothing".into(),
            Self::ValueEquals(text) => format!("value equal to payload ({} chars)", text.chars().count()),
            Self::Checked => "element checked".into(),
            Self::Visible => "element visible".into(),
            Self::AnyVisible(selector) => format!("a visible {}", selector),
            Self::AnyChecked(selector) => format!("{} checked", selector),
        }
    }
}

/// Describe how `actual` differs from `expected` without echoing either.
/// Payloads may be passwords.
fn value_difference(expected: &str, actual: Option<&str>) -> String {
    let Some(actual) = actual else {
        return "no value".into();
    };
    let first_diff = expected
        .chars()
        .zip(actual.chars())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| expected.chars().count().min(actual.chars().count()));
    format!(
        "value of {} chars, first difference at char {}",
        actual.chars().count(),
        first_diff
    )
}

async fn check_once<B: Backend + ?Sized>(
    backend: &mut B,
    element: ElementId,
    condition: &PostCondition,
) -> Result<(), String> {
    match condition {
        PostCondition::None => Ok(()),
        PostCondition::ValueEquals(expected) => {
            let snapshot = backend.inspect(element).await.map_err(|e| e.to_string())?;
            if snapshot.value.as_deref() == Some(expected.as_str()) {
                Ok(())
            } else {
                Err(value_difference(expected, snapshot.value.as_deref()))
            }
        }
        PostCondition::Checked => {
            let snapshot = backend.inspect(element).await.map_err(|e| e.to_string())?;
            if snapshot.checked {
                Ok(())
            } else {
                Err("unchecked".into())
            }
        }
        PostCondition::Visible => {
            let snapshot = backend.inspect(element).await.map_err(|e| e.to_string())?;
            if snapshot.visible {
                Ok(())
            } else {
                Err("hidden".into())
            }
        }
        PostCondition::AnyVisible(selector) => {
            let found = backend.query(selector).await.map_err(|e| e.to_string())?;
            if found.iter().any(|e| e.visible) {
                Ok(())
            } else {
                Err(format!("{} present, none visible", found.len()))
            }
        }
        PostCondition::AnyChecked(selector) => {
            let found = backend.query(selector).await.map_err(|e| e.to_string())?;
            if found.iter().any(|e| e.checked) {
                Ok(())
            } else if found.is_empty() {
                Err("no such control".into())
            } else {
                Err(format!("{} present, none checked", found.len()))
            }
        }
    }
}

/// Poll `condition` until it holds or `wait` elapses.
pub async fn verify<B: Backend + ?Sized>(
    backend: &mut B,
    element: ElementId,
    condition: &PostCondition,
    wait: Duration,
    poll_interval: Duration,
) -> Result<(), AttemptFailure> {
    let start = Instant::now();
    loop {
        let actual = match check_once(backend, element, condition).await {
            Ok(()) => return Ok(()),
            Err(actual) => actual,
        };

        let elapsed = start.elapsed();
        if elapsed >= wait {
            return Err(AttemptFailure::PostConditionMismatch {
                expected: condition.describe(),
                actual,
            });
        }
        tokio::time::sleep(poll_interval.min(wait - elapsed)).await;
    }
}
