//! Candidate lists per logical target.
//!
//! Lists are built once and never reordered: attribute selectors first, then
//! label and text matching, positional and generic fallbacks last. A YAML
//! `fields:` section may replace a field's list wholesale.

use holdfast_common::locator::{LocatorCandidate, Strategy, css_string};
use std::collections::HashMap;

/// Elements an organization name may render in once the dropdown is open.
pub const ORGANIZATION_OPTIONS: &str = r#"[role="option"], [class*="option"], li, option"#;

/// Elements a role label may render in.
pub const ROLE_LABELS: &str = "label, span, div";

/// Any role radio. At least one must be visible after an organization is chosen.
pub const ROLE_RADIOS: &str = r#"input[type="radio"]"#;

const TEXT_SCOPE: &str = "p, span, div, label, small, li, h1, h2, h3, h4, h5, h6";
const LINK_SCOPE: &str = "a";
const BUTTON_SCOPE: &str = r#"button, [role="button"], input[type="submit"]"#;

/// Field name aliases accepted in step text, mapped to catalog keys.
const FIELD_ALIASES: &[(&str, &str)] = &[
    ("firstname", "first name"),
    ("lastname", "last name"),
    ("email address", "email"),
    ("terms and conditions", "terms"),
    ("terms and conditions checkbox", "terms"),
    ("terms checkbox", "terms"),
    ("signup button", "signup"),
    ("sign up", "signup"),
    ("organization", "organization dropdown"),
    ("organisation dropdown", "organization dropdown"),
    ("speechpundit logo", "logo"),
    ("terms and conditions modal", "terms modal"),
    ("modal close button", "close modal"),
];

pub fn canonical_field(name: &str) -> &str {
    FIELD_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, key)| *key)
        .unwrap_or(name)
}

fn css(selector: &str) -> LocatorCandidate {
    LocatorCandidate::new(Strategy::css(selector))
}

fn placeholder_field(placeholder: &str, label: &str, position: usize) -> Vec<LocatorCandidate> {
    let quoted = css_string(placeholder);
    vec![
        css(&format!("input[placeholder={}]", quoted)),
        css(&format!("[placeholder={}]", quoted)),
        LocatorCandidate::new(Strategy::label(label)),
        LocatorCandidate::new(Strategy::nth("input", position))
            .with_note("form order, last resort"),
    ]
}

#[derive(Debug, Clone)]
pub struct Catalog {
    fields: HashMap<String, Vec<LocatorCandidate>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::registration()
    }
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Lists for the registration form.
    pub fn registration() -> Self {
        let mut fields = HashMap::new();

        fields.insert(
            "first name".to_string(),
            placeholder_field("First Name", "First Name", 0),
        );
        fields.insert(
            "last name".to_string(),
            placeholder_field("Last Name", "Last Name", 1),
        );

        let mut email = vec![css(r#"input[type="email"]"#)];
        email.extend(placeholder_field("Email", "Email", 2));
        fields.insert("email".to_string(), email);

        let mut password = vec![css(r#"input[type="password"]"#)];
        password.extend(placeholder_field("Password", "Password", 3));
        fields.insert("password".to_string(), password);

        fields.insert(
            "terms".to_string(),
            vec![
                css(r#"input[type="checkbox"][name*="terms" i]"#),
                css(r#"input[type="checkbox"][id*="terms" i]"#),
                LocatorCandidate::new(Strategy::label("terms")),
                css(r#"input[type="checkbox"]"#).with_note("only checkbox on the form"),
            ],
        );

        fields.insert(
            "signup".to_string(),
            vec![
                css(r#"button[type="submit"]"#),
                LocatorCandidate::new(Strategy::exact_text("button", "Signup")),
                LocatorCandidate::new(Strategy::fuzzy(BUTTON_SCOPE, "Sign")),
            ],
        );

        fields.insert(
            "organization dropdown".to_string(),
            vec![
                css(".react-select__control"),
                css(r#"[role="combobox"]"#),
                css(r#"[placeholder*="Organization"]"#),
                css(r#"[aria-label*="Organization"]"#),
                LocatorCandidate::new(Strategy::exact_text("div, span", "Select Organization")),
                css("select"),
            ],
        );

        fields.insert(
            "close modal".to_string(),
            vec![
                css(r#"[role="dialog"] [aria-label="Close"]"#),
                css(r#"[aria-label="Close"]"#),
                LocatorCandidate::new(Strategy::exact_text("button", "Close")),
                css(".modal .btn-close"),
            ],
        );

        fields.insert(
            "logo".to_string(),
            vec![
                css(r#"a[href="/"]"#),
                css(r#"img[alt*="logo" i]"#),
                css(r#"[class*="logo"]"#),
            ],
        );

        fields.insert(
            "terms modal".to_string(),
            vec![
                css(r#"[role="dialog"]"#),
                css("dialog"),
                css(".modal"),
                LocatorCandidate::new(Strategy::fuzzy(".modal-title, h1, h2, h3, h4, h5", "Terms and Conditions")),
            ],
        );

        Self { fields }
    }

    /// Replace the lists of the named fields.
    pub fn with_overrides(mut self, overrides: &HashMap<String, Vec<Strategy>>) -> Self {
        for (name, strategies) in overrides {
            let key = holdfast_common::intent::normalize_field_name(name);
            let list = strategies
                .iter()
                .cloned()
                .map(|s| LocatorCandidate::new(s).with_note("configured"))
                .collect();
            self.fields.insert(canonical_field(&key).to_string(), list);
        }
        self
    }

    pub fn field(&self, name: &str) -> Option<&[LocatorCandidate]> {
        self.fields.get(canonical_field(name)).map(Vec::as_slice)
    }

    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Option lists truncate long names and decorate short ones, so exact text
/// is tried first and mutual-substring matching second.
pub fn organization_candidates(name: &str) -> Vec<LocatorCandidate> {
    vec![
        LocatorCandidate::new(Strategy::exact_text(ORGANIZATION_OPTIONS, name)),
        LocatorCandidate::new(Strategy::fuzzy(ORGANIZATION_OPTIONS, name)),
    ]
}

pub fn role_radio(value: &str) -> String {
    format!(r#"input[type="radio"][value={}]"#, css_string(value))
}

/// `label` is the variant currently rendered; `value` is what gets verified.
pub fn role_candidates(label: &str, value: &str) -> Vec<LocatorCandidate> {
    vec![
        LocatorCandidate::new(Strategy::exact_text(ROLE_LABELS, label))
            .with_note("rendered label"),
        css(&role_radio(value)),
        LocatorCandidate::new(Strategy::label(label)),
    ]
}

/// Candidates for reading back whether a role is selected.
pub fn role_checked_candidates(label: &str, value: &str) -> Vec<LocatorCandidate> {
    vec![
        css(&role_radio(value)),
        css(&format!(
            r#"input[name="role"][value={}]"#,
            css_string(value)
        )),
        LocatorCandidate::new(Strategy::label(label)),
    ]
}

pub fn text_candidates(text: &str) -> Vec<LocatorCandidate> {
    vec![
        LocatorCandidate::new(Strategy::exact_text(TEXT_SCOPE, text)),
        LocatorCandidate::new(Strategy::fuzzy(TEXT_SCOPE, text)),
    ]
}

pub fn link_candidates(text: &str) -> Vec<LocatorCandidate> {
    vec![
        LocatorCandidate::new(Strategy::exact_text(LINK_SCOPE, text)),
        LocatorCandidate::new(Strategy::fuzzy(LINK_SCOPE, text)),
    ]
}

pub fn button_candidates(text: &str) -> Vec<LocatorCandidate> {
    vec![
        LocatorCandidate::new(Strategy::exact_text(BUTTON_SCOPE, text)),
        LocatorCandidate::new(Strategy::fuzzy(BUTTON_SCOPE, text)),
    ]
}
