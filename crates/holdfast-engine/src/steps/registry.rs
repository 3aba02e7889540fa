use holdfast_common::intent::{Intent, IntentError};
use regex::Regex;
use std::fmt;
use thiserror::Error;

const KEYWORDS: &[&str] = &["Given", "When", "Then", "And", "But", "*"];

/// What a matched step asks the runner to do.
#[derive(Debug, Clone, PartialEq)]
pub enum StepCommand {
    /// Path relative to the configured base URL, or an absolute URL.
    Navigate(String),
    Back,
    Run(Intent),
    ExpectUrlContains(String),
}

impl fmt::Display for StepCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate(path) => write!(f, "navigate {}", path),
            Self::Back => f.write_str("back"),
            Self::Run(intent) => write!(f, "{}", intent),
            Self::ExpectUrlContains(part) => write!(f, "expect url contains {:?}", part),
        }
    }
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("No step definition matches: {0}")]
    NoMatch(String),

    #[error("Step {step:?} matches several definitions: {patterns:?}")]
    Ambiguous { step: String, patterns: Vec<String> },

    #[error("Invalid step pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error(transparent)]
    Intent(#[from] IntentError),
}

type StepHandler = Box<dyn Fn(&[String]) -> Result<Vec<StepCommand>, StepError> + Send + Sync>;

struct StepDefinition {
    pattern: String,
    regex: Regex,
    handler: StepHandler,
}

/// Step patterns in registration order.
///
/// Patterns are literal text with placeholders: `{string}` matches a
/// double-quoted argument (`\"` and `\\` escapes allowed) and `{text}` matches
/// any non-empty run of characters. Patterns are anchored at both ends.
#[derive(Default)]
pub struct StepRegistry {
    steps: Vec<StepDefinition>,
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|s| &s.pattern))
            .finish()
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, StepError> {
    let mut source = String::from("^");
    let mut rest = pattern;
    while let Some(start) = rest.find('{') {
        source.push_str(&regex::escape(&rest[..start]));
        let after = &rest[start..];
        if let Some(tail) = after.strip_prefix("{string}") {
            source.push_str(r#""((?:[^"\\]|\\.)*)""#);
            rest = tail;
        } else if let Some(tail) = after.strip_prefix("{text}") {
            source.push_str("(.+?)");
            rest = tail;
        } else {
            source.push_str(r"\{");
            rest = &after[1..];
        }
    }
    source.push_str(&regex::escape(rest));
    source.push('$');

    Regex::new(&source).map_err(|source| StepError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn unescape(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len());
    let mut chars = arg.chars();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(next) = chars.next()
        {
            out.push(next);
            continue;
        }
        out.push(c);
    }
    out
}

/// Drop a leading Gherkin keyword and surrounding whitespace.
pub fn strip_keyword(line: &str) -> &str {
    let trimmed = line.trim();
    for keyword in KEYWORDS {
        if let Some(rest) = trimmed.strip_prefix(keyword)
            && (rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            return rest.trim_start();
        }
    }
    trimmed
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, pattern: &str, handler: F) -> Result<(), StepError>
    where
        F: Fn(&[String]) -> Result<Vec<StepCommand>, StepError> + Send + Sync + 'static,
    {
        let regex = compile_pattern(pattern)?;
        self.steps.push(StepDefinition {
            pattern: pattern.to_string(),
            regex,
            handler: Box::new(handler),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.pattern.as_str())
    }

    /// Match a step line and produce its commands.
    pub fn resolve(&self, line: &str) -> Result<Vec<StepCommand>, StepError> {
        let text = strip_keyword(line);

        let mut matched: Vec<(&StepDefinition, Vec<String>)> = Vec::new();
        for step in &self.steps {
            if let Some(caps) = step.regex.captures(text) {
                let args = caps
                    .iter()
                    .skip(1)
                    .map(|m| m.map(|m| unescape(m.as_str())).unwrap_or_default())
                    .collect();
                matched.push((step, args));
            }
        }

        match matched.len() {
            0 => Err(StepError::NoMatch(text.to_string())),
            1 => {
                let (step, args) = &matched[0];
                (step.handler)(args)
            }
            _ => Err(StepError::Ambiguous {
                step: text.to_string(),
                patterns: matched.iter().map(|(s, _)| s.pattern.clone()).collect(),
            }),
        }
    }
}
