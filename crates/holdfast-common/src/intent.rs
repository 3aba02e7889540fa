//! Semantic action requests.
//!
//! An [`Intent`] says *what* should happen ("fill the first-name field with
//! X") without saying *how* the element is found. It is built right before
//! execution and dropped afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentKind {
    Fill,
    Click,
    SelectOption,
    Check,
    VerifyChecked,
    VerifyVisible,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Click => "click",
            Self::SelectOption => "select-option",
            Self::Check => "check",
            Self::VerifyChecked => "verify-checked",
            Self::VerifyVisible => "verify-visible",
        }
    }

    /// Whether the intent mutates the page.
    pub fn is_action(&self) -> bool {
        !matches!(self, Self::VerifyChecked | Self::VerifyVisible)
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IntentKind {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fill" => Ok(Self::Fill),
            "click" => Ok(Self::Click),
            "select-option" | "select" => Ok(Self::SelectOption),
            "check" => Ok(Self::Check),
            "verify-checked" => Ok(Self::VerifyChecked),
            "verify-visible" => Ok(Self::VerifyVisible),
            other => Err(IntentError::UnknownKind(other.to_string())),
        }
    }
}

/// What an intent is aimed at, parsed from its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// Logical form field from the catalog ("first name", "terms", ...)
    Field(String),
    Organization(String),
    Role(String),
    Text(String),
    Link(String),
    Button(String),
}

impl Target {
    /// Parse a target description.
    ///
    /// `"organization: TEST Org"`, `"role: Student"`, `"text: ..."`,
    /// `"link: ..."` and `"button: ..."` are prefixed forms; anything else
    /// names a catalog field.
    pub fn parse(description: &str) -> Result<Self, IntentError> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(IntentError::EmptyTarget);
        }

        if let Some((prefix, rest)) = trimmed.split_once(':') {
            let value = rest.trim().to_string();
            let target = match prefix.trim().to_ascii_lowercase().as_str() {
                "organization" | "org" => Some(Self::Organization(value.clone())),
                "role" => Some(Self::Role(value.clone())),
                "text" => Some(Self::Text(value.clone())),
                "link" => Some(Self::Link(value.clone())),
                "button" => Some(Self::Button(value.clone())),
                _ => None,
            };
            if let Some(target) = target {
                if value.is_empty() {
                    return Err(IntentError::EmptyTarget);
                }
                return Ok(target);
            }
        }

        Ok(Self::Field(normalize_field_name(trimmed)))
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Field(s)
            | Self::Organization(s)
            | Self::Role(s)
            | Self::Text(s)
            | Self::Link(s)
            | Self::Button(s) => s,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Organization(name) => write!(f, "organization: {}", name),
            Self::Role(name) => write!(f, "role: {}", name),
            Self::Text(text) => write!(f, "text: {}", text),
            Self::Link(text) => write!(f, "link: {}", text),
            Self::Button(text) => write!(f, "button: {}", text),
        }
    }
}

/// Lower-case and collapse whitespace: `"First  Name"` → `"first name"`.
pub fn normalize_field_name(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub target: Target,
    /// The description the intent was built from, kept for logs and reports.
    pub description: String,
    /// Literal text for `fill`. Never trimmed, escaped or truncated.
    pub payload: Option<String>,
}

impl Intent {
    pub fn new(
        kind: IntentKind,
        description: &str,
        payload: Option<String>,
    ) -> Result<Self, IntentError> {
        let target = Target::parse(description)?;
        match (kind, &payload) {
            (IntentKind::Fill, None) => return Err(IntentError::MissingPayload),
            (k, Some(_)) if k != IntentKind::Fill => {
                return Err(IntentError::UnexpectedPayload(k));
            }
            _ => {}
        }
        Ok(Self {
            kind,
            target,
            description: description.trim().to_string(),
            payload,
        })
    }

    pub fn fill(description: &str, text: impl Into<String>) -> Result<Self, IntentError> {
        Self::new(IntentKind::Fill, description, Some(text.into()))
    }

    pub fn click(description: &str) -> Result<Self, IntentError> {
        Self::new(IntentKind::Click, description, None)
    }

    pub fn select(description: &str) -> Result<Self, IntentError> {
        Self::new(IntentKind::SelectOption, description, None)
    }

    pub fn check(description: &str) -> Result<Self, IntentError> {
        Self::new(IntentKind::Check, description, None)
    }

    pub fn verify_checked(description: &str) -> Result<Self, IntentError> {
        Self::new(IntentKind::VerifyChecked, description, None)
    }

    pub fn verify_visible(description: &str) -> Result<Self, IntentError> {
        Self::new(IntentKind::VerifyVisible, description, None)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.kind, self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("Target description must not be empty")]
    EmptyTarget,
    #[error("Fill intents require a payload")]
    MissingPayload,
    #[error("{0} intents do not take a payload")]
    UnexpectedPayload(IntentKind),
    #[error("Unknown intent kind: {0}")]
    UnknownKind(String),
}
