//! Locator candidates: one way of finding the element an intent targets.
//!
//! Candidates are plain data. The engine evaluates them one at a time in the
//! order a list declares them; nothing here reorders a list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolution method paired with its selector expression.
///
/// Serialized as a single-key map (`css: "#pw"`, `nth: { scope: input, index: 0 }`)
/// in every format, so config files and JSON reports read the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StrategyMap", into = "StrategyMap")]
pub enum Strategy {
    /// Attribute / CSS selector match; first actionable match wins.
    Css(String),
    /// Element under `scope` whose normalised text equals `text`.
    ExactText { scope: String, text: String },
    /// The `index`-th element matching `scope` (document order, zero-based).
    Nth { scope: String, index: usize },
    /// Form control associated with a `<label>` containing this text.
    Label(String),
    /// Element under `scope` whose text and `text` are equal or mutual substrings.
    Fuzzy { scope: String, text: String },
}

impl Strategy {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn exact_text(scope: impl Into<String>, text: impl Into<String>) -> Self {
        Self::ExactText {
            scope: scope.into(),
            text: text.into(),
        }
    }

    pub fn nth(scope: impl Into<String>, index: usize) -> Self {
        Self::Nth {
            scope: scope.into(),
            index,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::Label(text.into())
    }

    pub fn fuzzy(scope: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Fuzzy {
            scope: scope.into(),
            text: text.into(),
        }
    }

    /// Short method name used in logs.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Css(_) => "attribute",
            Self::ExactText { .. } => "exact-text",
            Self::Nth { .. } => "position",
            Self::Label(_) => "label-association",
            Self::Fuzzy { .. } => "fuzzy-text",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => write!(f, "css={}", selector),
            Self::ExactText { scope, text } => write!(f, "{} text={:?}", scope, text),
            Self::Nth { scope, index } => write!(f, "{} >> nth={}", scope, index),
            Self::Label(text) => write!(f, "label={:?}", text),
            Self::Fuzzy { scope, text } => write!(f, "{} text~={:?}", scope, text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScopedText {
    scope: String,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Positional {
    scope: String,
    index: usize,
}

/// Wire form of [`Strategy`]: exactly one key set.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StrategyMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exact_text: Option<ScopedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nth: Option<Positional>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fuzzy: Option<ScopedText>,
}

impl TryFrom<StrategyMap> for Strategy {
    type Error = String;

    fn try_from(map: StrategyMap) -> Result<Self, Self::Error> {
        let StrategyMap {
            css,
            exact_text,
            nth,
            label,
            fuzzy,
        } = map;
        let mut found: Vec<Strategy> = Vec::with_capacity(1);
        found.extend(css.map(Strategy::Css));
        found.extend(exact_text.map(|t| Strategy::exact_text(t.scope, t.text)));
        found.extend(nth.map(|p| Strategy::nth(p.scope, p.index)));
        found.extend(label.map(Strategy::Label));
        found.extend(fuzzy.map(|t| Strategy::fuzzy(t.scope, t.text)));

        match found.len() {
            1 => Ok(found.remove(0)),
            0 => Err("strategy needs one of css, exact_text, nth, label, fuzzy".to_string()),
            n => Err(format!("strategy sets {} methods, expected exactly one", n)),
        }
    }
}

impl From<Strategy> for StrategyMap {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Css(selector) => Self {
                css: Some(selector),
                ..Self::default()
            },
            Strategy::ExactText { scope, text } => Self {
                exact_text: Some(ScopedText { scope, text }),
                ..Self::default()
            },
            Strategy::Nth { scope, index } => Self {
                nth: Some(Positional { scope, index }),
                ..Self::default()
            },
            Strategy::Label(text) => Self {
                label: Some(text),
                ..Self::default()
            },
            Strategy::Fuzzy { scope, text } => Self {
                fuzzy: Some(ScopedText { scope, text }),
                ..Self::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorCandidate {
    pub strategy: Strategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LocatorCandidate {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn describe(&self) -> String {
        match &self.note {
            Some(note) => format!("{} [{}] ({})", self.strategy, self.strategy.method(), note),
            None => format!("{} [{}]", self.strategy, self.strategy.method()),
        }
    }
}

impl From<Strategy> for LocatorCandidate {
    fn from(strategy: Strategy) -> Self {
        Self::new(strategy)
    }
}

/// What a resolved element must satisfy before it counts as found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Exists in the DOM (custom-styled radios are often hidden).
    Present,
    Visible,
    /// Visible and enabled.
    Actionable,
}

impl Requirement {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Actionable => "visible and enabled",
        }
    }
}

/// Quote a value for use inside a CSS attribute selector.
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
