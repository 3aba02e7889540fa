//! Calls into the injected page scanner, and decoding of its replies.
//!
//! Both browser backends speak to the page through `window.Holdfast`. They
//! differ only in how a script is evaluated: CDP takes an expression whose
//! last statement is the value, WebDriver takes a function body.

use crate::backend::BackendError;
use holdfast_common::protocol::{ElementId, ElementSnapshot};
pub use holdfast_scanner::SCANNER_JS;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub fn query(selector: &str) -> Result<String, BackendError> {
    Ok(format!(
        "window.Holdfast.query({})",
        serde_json::to_string(selector)?
    ))
}

pub fn inspect(id: ElementId) -> String {
    format!("window.Holdfast.inspect({})", id)
}

pub fn click(id: ElementId) -> String {
    format!("window.Holdfast.click({})", id)
}

pub fn check(id: ElementId) -> String {
    format!("window.Holdfast.check({})", id)
}

/// The text travels as a JSON string literal and is assigned as a value, so
/// markup and script payloads land in the field verbatim.
pub fn fill(id: ElementId, text: &str) -> Result<String, BackendError> {
    Ok(format!(
        "window.Holdfast.fill({}, {})",
        id,
        serde_json::to_string(text)?
    ))
}

/// Scanner plus call, for evaluators that return the last statement's value.
pub fn expression(call: &str) -> String {
    format!("{}\n{};", SCANNER_JS, call)
}

/// Scanner plus call, for evaluators that run a function body.
pub fn function_body(call: &str) -> String {
    format!("{}\nreturn {};", SCANNER_JS, call)
}

#[derive(Debug, Deserialize)]
struct Reply {
    ok: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

fn decode_reply(value: Value, id: Option<ElementId>) -> Result<Value, BackendError> {
    let reply: Reply = serde_json::from_value(value)?;
    if reply.ok {
        return Ok(reply.data);
    }
    let id = id.unwrap_or_default();
    Err(match reply.code.as_str() {
        "invalid_selector" => BackendError::SelectorInvalid {
            selector: reply.message,
        },
        "not_found" => BackendError::ElementNotFound { id },
        "stale" => BackendError::ElementStale { id },
        "not_interactable" => BackendError::ElementNotInteractable {
            id,
            reason: reply.message,
        },
        _ => BackendError::ScriptError(reply.message),
    })
}

pub fn decode_query(value: Value) -> Result<Vec<ElementSnapshot>, BackendError> {
    Ok(serde_json::from_value(decode_reply(value, None)?)?)
}

pub fn decode_element<T: DeserializeOwned>(value: Value, id: ElementId) -> Result<T, BackendError> {
    Ok(serde_json::from_value(decode_reply(value, Some(id))?)?)
}
