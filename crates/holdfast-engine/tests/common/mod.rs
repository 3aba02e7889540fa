//! In-memory page used as a `Backend` by the engine tests.
//!
//! Nodes form a tree with a small CSS subset (tag, `#id`, `.class`,
//! `[attr]`, `[attr="v"]`, `*=`, `^=`, `$=`, the ` i` flag, descendant
//! combinator, selector lists). Clicks follow browser rules for labels,
//! radios and checkboxes, plus per-node scripted effects.

#![allow(dead_code)]

use async_trait::async_trait;
use holdfast_engine::backend::{Backend, BackendError, NavigationResult};
use holdfast_engine::protocol::{ElementId, ElementSnapshot, Rect};
use std::collections::HashMap;

pub const BASE_URL: &str = "https://enterprise02.speechpundit.com";

pub const ORGANIZATIONS: [&str; 7] = [
    "Rotary Four-Way Test Contest",
    "FULFEEMENT",
    "TEST Org",
    "Snider Consulting Group",
    "IIT Alumni Association of North Texas (IITNT)",
    "Sails Software",
    "speechpundit",
];

#[derive(Debug, Clone)]
pub enum Effect {
    None,
    Show(ElementId),
    Hide(ElementId),
    /// Close the menu, show the role group and set label texts.
    SelectOrganization {
        menu: ElementId,
        roles: ElementId,
        labels: Vec<(ElementId, String)>,
    },
    Navigate(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub text: String,
    pub attrs: HashMap<String, String>,
    pub parent: Option<ElementId>,
    pub rect: Rect,
    pub visible: bool,
    pub enabled: bool,
    pub checked: bool,
    pub value: Option<String>,
    pub on_click: Effect,
    /// Controlled input that ignores typing.
    pub rejects_fill: bool,
    /// Hidden until this many queries have been answered.
    pub visible_after_queries: usize,
}

pub fn node(tag: &str) -> Node {
    let value = matches!(tag, "input" | "textarea" | "select").then(String::new);
    Node {
        tag: tag.to_string(),
        text: String::new(),
        attrs: HashMap::new(),
        parent: None,
        rect: Rect::new(0.0, 0.0, 100.0, 30.0),
        visible: true,
        enabled: true,
        checked: false,
        value,
        on_click: Effect::None,
        rejects_fill: false,
        visible_after_queries: 0,
    }
}

impl Node {
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn at(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.rect = Rect::new(x, y, width, height);
        self
    }

    pub fn row(self, row: usize) -> Self {
        self.at(0.0, row as f32 * 60.0, 300.0, 30.0)
    }

    pub fn inside(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn on_click(mut self, effect: Effect) -> Self {
        self.on_click = effect;
        self
    }

    pub fn rejects_fill(mut self) -> Self {
        self.rejects_fill = true;
        self
    }

    pub fn visible_after_queries(mut self, count: usize) -> Self {
        self.visible_after_queries = count;
        self
    }
}

#[derive(Debug, Default)]
pub struct MockBackend {
    pub nodes: Vec<Node>,
    pub url: String,
    pub history: Vec<String>,
    pub launched: bool,
    pub closed: bool,
    pub fail_launch: bool,
    pub fail_screenshot: bool,
    pub screenshots: usize,
    pub queries: usize,
    pub fills: Vec<(ElementId, String)>,
    pub clicks: Vec<ElementId>,
    /// Dialogs opened by page scripts. The mock never runs payloads, so this
    /// stays empty unless a test pushes to it.
    pub alerts: Vec<String>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            url: "about:blank".into(),
            ..Default::default()
        }
    }

    /// Already launched, as the executor expects.
    pub fn ready() -> Self {
        let mut backend = Self::new();
        backend.launched = true;
        backend
    }

    pub fn add(&mut self, node: Node) -> ElementId {
        self.nodes.push(node);
        self.nodes.len() as ElementId
    }

    pub fn get(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get((id as usize).checked_sub(1)?)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut((id as usize).checked_sub(1)?)
    }

    pub fn find(&self, dom_id: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .position(|n| n.attrs.get("id").map(String::as_str) == Some(dom_id))
            .map(|i| i as ElementId + 1)
    }

    pub fn value_of(&self, dom_id: &str) -> Option<String> {
        self.find(dom_id)
            .and_then(|id| self.get(id))
            .and_then(|n| n.value.clone())
    }

    pub fn is_checked(&self, dom_id: &str) -> bool {
        self.find(dom_id)
            .and_then(|id| self.get(id))
            .is_some_and(|n| n.checked)
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(node) = self.get_mut(id) {
            node.text = text.to_string();
        }
    }

    fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut current = self.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            out.push(p);
            current = self.get(p).and_then(|n| n.parent);
        }
        out
    }

    fn effectively_visible(&self, id: ElementId) -> bool {
        let own = self.get(id).is_some_and(|n| {
            n.visible && self.queries >= n.visible_after_queries
        });
        own && self
            .ancestors(id)
            .into_iter()
            .all(|a| self.get(a).is_some_and(|n| n.visible))
    }

    fn text_content(&self, id: ElementId) -> String {
        let mut text = self.get(id).map(|n| n.text.clone()).unwrap_or_default();
        for (i, child) in self.nodes.iter().enumerate() {
            if child.parent == Some(id) {
                text.push_str(&self.text_content(i as ElementId + 1));
            }
        }
        text
    }

    fn snapshot(&self, id: ElementId) -> Option<ElementSnapshot> {
        let node = self.get(id)?;
        let visible = self.effectively_visible(id);
        Some(ElementSnapshot {
            id,
            tag: node.tag.clone(),
            text: self.text_content(id),
            value: node.value.clone(),
            attributes: node.attrs.clone(),
            rect: if visible { node.rect.clone() } else { Rect::default() },
            visible,
            enabled: node.enabled,
            checked: node.checked,
        })
    }

    fn activate(&mut self, id: ElementId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.tag != "input" {
            return;
        }
        let kind = node.attrs.get("type").cloned();
        let name = node.attrs.get("name").cloned();

        match kind.as_deref() {
            Some("radio") => {
                for (i, other) in self.nodes.iter_mut().enumerate() {
                    if i as ElementId + 1 == id {
                        other.checked = true;
                    } else if name.is_some()
                        && other.attrs.get("type").map(String::as_str) == Some("radio")
                        && other.attrs.get("name") == name.as_ref()
                    {
                        other.checked = false;
                    }
                }
            }
            Some("checkbox") => {
                if let Some(node) = self.get_mut(id) {
                    node.checked = !node.checked;
                }
            }
            _ => {}
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Show(id) => {
                if let Some(n) = self.get_mut(id) {
                    n.visible = true;
                }
            }
            Effect::Hide(id) => {
                if let Some(n) = self.get_mut(id) {
                    n.visible = false;
                }
            }
            Effect::SelectOrganization {
                menu,
                roles,
                labels,
            } => {
                self.apply(Effect::Hide(menu));
                self.apply(Effect::Show(roles));
                for (id, text) in labels {
                    self.set_text(id, &text);
                }
            }
            Effect::Navigate(url) => {
                self.history.push(std::mem::replace(&mut self.url, url));
            }
        }
    }

    fn matches(&self, id: ElementId, selector: &[Compound]) -> bool {
        let Some((last, rest)) = selector.split_last() else {
            return false;
        };
        if !self.matches_compound(id, last) {
            return false;
        }
        let mut ancestors = self.ancestors(id).into_iter();
        'outer: for compound in rest.iter().rev() {
            for ancestor in ancestors.by_ref() {
                if self.matches_compound(ancestor, compound) {
                    continue 'outer;
                }
            }
            return false;
        }
        true
    }

    fn matches_compound(&self, id: ElementId, compound: &Compound) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        if let Some(tag) = &compound.tag
            && tag != "*"
            && *tag != node.tag
        {
            return false;
        }
        compound.conditions.iter().all(|c| match c {
            Condition::Id(v) => node.attrs.get("id") == Some(v),
            Condition::Class(v) => node
                .attrs
                .get("class")
                .is_some_and(|cls| cls.split_whitespace().any(|c| c == v)),
            Condition::Attr {
                name,
                op,
                value,
                ignore_case,
            } => {
                let Some(actual) = node.attrs.get(name) else {
                    return false;
                };
                let (actual, value) = if *ignore_case {
                    (actual.to_lowercase(), value.to_lowercase())
                } else {
                    (actual.clone(), value.clone())
                };
                match op {
                    AttrOp::Exists => true,
                    AttrOp::Equals => actual == value,
                    AttrOp::Contains => actual.contains(&value),
                    AttrOp::Prefix => actual.starts_with(&value),
                    AttrOp::Suffix => actual.ends_with(&value),
                }
            }
        })
    }

    fn require_interactable(&self, id: ElementId) -> Result<(), BackendError> {
        let node = self.get(id).ok_or(BackendError::ElementNotFound { id })?;
        if !self.effectively_visible(id) {
            return Err(BackendError::ElementNotInteractable {
                id,
                reason: "not visible".into(),
            });
        }
        if !node.enabled {
            return Err(BackendError::ElementNotInteractable {
                id,
                reason: "disabled".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        if self.fail_launch {
            return Err(BackendError::Other("browser binary not found".into()));
        }
        self.launched = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.launched = false;
        self.closed = true;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.launched
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        if !self.launched {
            return Err(BackendError::NotReady);
        }
        self.apply(Effect::Navigate(url.to_string()));
        Ok(NavigationResult {
            url: url.to_string(),
            title: "SpeechPundit".into(),
            status: 200,
        })
    }

    async fn current_url(&mut self) -> Result<String, BackendError> {
        Ok(self.url.clone())
    }

    async fn go_back(&mut self) -> Result<NavigationResult, BackendError> {
        let previous = self
            .history
            .pop()
            .ok_or_else(|| BackendError::Navigation("no history".into()))?;
        self.url = previous.clone();
        Ok(NavigationResult {
            url: previous,
            title: "SpeechPundit".into(),
            status: 200,
        })
    }

    async fn query(&mut self, selector: &str) -> Result<Vec<ElementSnapshot>, BackendError> {
        if !self.launched {
            return Err(BackendError::NotReady);
        }
        let list = parse_selector_list(selector).ok_or_else(|| BackendError::SelectorInvalid {
            selector: selector.to_string(),
        })?;
        self.queries += 1;
        let ids: Vec<ElementId> = (1..=self.nodes.len() as ElementId)
            .filter(|id| list.iter().any(|sel| self.matches(*id, sel)))
            .collect();
        Ok(ids.into_iter().filter_map(|id| self.snapshot(id)).collect())
    }

    async fn inspect(&mut self, id: ElementId) -> Result<ElementSnapshot, BackendError> {
        self.snapshot(id).ok_or(BackendError::ElementNotFound { id })
    }

    async fn click(&mut self, id: ElementId) -> Result<(), BackendError> {
        self.require_interactable(id)?;
        self.clicks.push(id);
        let node = self.get(id).cloned().ok_or(BackendError::ElementNotFound { id })?;

        if node.tag == "label"
            && let Some(target) = node.attrs.get("for").and_then(|f| self.find(f))
        {
            self.activate(target);
        } else {
            self.activate(id);
        }

        // Click handlers bubble to ancestors.
        self.apply(node.on_click);
        for ancestor in self.ancestors(id) {
            if let Some(effect) = self.get(ancestor).map(|n| n.on_click.clone()) {
                self.apply(effect);
            }
        }
        Ok(())
    }

    async fn fill(&mut self, id: ElementId, text: &str) -> Result<(), BackendError> {
        self.require_interactable(id)?;
        let node = self.get_mut(id).ok_or(BackendError::ElementNotFound { id })?;
        if !matches!(node.tag.as_str(), "input" | "textarea") {
            return Err(BackendError::ElementNotInteractable {
                id,
                reason: format!("cannot fill <{}>", node.tag),
            });
        }
        if !node.rejects_fill {
            node.value = Some(text.to_string());
        }
        self.fills.push((id, text.to_string()));
        Ok(())
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        if self.fail_screenshot {
            return Err(BackendError::Other("screenshot unavailable".into()));
        }
        self.screenshots += 1;
        Ok(b"\x89PNG\r\n\x1a\nmock".to_vec())
    }
}

#[derive(Debug)]
enum AttrOp {
    Exists,
    Equals,
    Contains,
    Prefix,
    Suffix,
}

#[derive(Debug)]
enum Condition {
    Id(String),
    Class(String),
    Attr {
        name: String,
        op: AttrOp,
        value: String,
        ignore_case: bool,
    },
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    conditions: Vec<Condition>,
}

/// Split on `sep` outside brackets and quotes.
fn split_top_level(input: &str, sep: impl Fn(char) -> bool) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in input.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(_), '\\') => {
                escaped = true;
                current.push(c);
            }
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                current.push(c);
            }
            (None, '[') => {
                depth += 1;
                current.push(c);
            }
            (None, ']') => {
                depth -= 1;
                current.push(c);
            }
            (None, c) if depth == 0 && sep(c) => {
                if !current.trim().is_empty() {
                    parts.push(current.trim().to_string());
                }
                current.clear();
            }
            (None, c) => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn parse_selector_list(selector: &str) -> Option<Vec<Vec<Compound>>> {
    let list = split_top_level(selector, |c| c == ',');
    if list.is_empty() {
        return None;
    }
    list.iter()
        .map(|complex| {
            split_top_level(complex, char::is_whitespace)
                .iter()
                .map(|c| parse_compound(c))
                .collect::<Option<Vec<_>>>()
        })
        .collect()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(input: &str) -> Option<Compound> {
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    let mut compound = Compound::default();

    let start = i;
    while i < chars.len() && (is_ident_char(chars[i]) || chars[i] == '*') {
        i += 1;
    }
    if i > start {
        compound.tag = Some(chars[start..i].iter().collect::<String>().to_lowercase());
    }

    while i < chars.len() {
        match chars[i] {
            '#' | '.' => {
                let kind = chars[i];
                i += 1;
                let start = i;
                while i < chars.len() && is_ident_char(chars[i]) {
                    i += 1;
                }
                if i == start {
                    return None;
                }
                let name: String = chars[start..i].iter().collect();
                compound.conditions.push(if kind == '#' {
                    Condition::Id(name)
                } else {
                    Condition::Class(name)
                });
            }
            '[' => {
                let end = find_closing_bracket(&chars, i)?;
                compound.conditions.push(parse_attr(&chars[i + 1..end])?);
                i = end + 1;
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn find_closing_bracket(chars: &[char], open: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (offset, &c) in chars[open + 1..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, ']') => return Some(open + 1 + offset),
            _ => {}
        }
    }
    None
}

fn parse_attr(body: &[char]) -> Option<Condition> {
    let text: String = body.iter().collect();
    let text = text.trim();
    let name_end = text
        .find(|c: char| !is_ident_char(c))
        .unwrap_or(text.len());
    let name = text[..name_end].to_string();
    if name.is_empty() {
        return None;
    }
    let rest = text[name_end..].trim_start();
    if rest.is_empty() {
        return Some(Condition::Attr {
            name,
            op: AttrOp::Exists,
            value: String::new(),
            ignore_case: false,
        });
    }

    let (op, rest) = if let Some(r) = rest.strip_prefix("*=") {
        (AttrOp::Contains, r)
    } else if let Some(r) = rest.strip_prefix("^=") {
        (AttrOp::Prefix, r)
    } else if let Some(r) = rest.strip_prefix("$=") {
        (AttrOp::Suffix, r)
    } else if let Some(r) = rest.strip_prefix('=') {
        (AttrOp::Equals, r)
    } else {
        return None;
    };
    let rest = rest.trim_start();

    let (value, flags) = match rest.chars().next()? {
        q @ ('"' | '\'') => {
            let mut value = String::new();
            let mut chars = rest[1..].char_indices();
            let mut end = None;
            while let Some((idx, c)) = chars.next() {
                match c {
                    '\\' => {
                        if let Some((_, next)) = chars.next() {
                            value.push(next);
                        }
                    }
                    c if c == q => {
                        end = Some(idx + 2);
                        break;
                    }
                    c => value.push(c),
                }
            }
            (value, &rest[end?..])
        }
        _ => {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            (rest[..end].to_string(), &rest[end..])
        }
    };

    let ignore_case = match flags.trim() {
        "" => false,
        "i" | "I" => true,
        _ => return None,
    };
    Some(Condition::Attr {
        name,
        op,
        value,
        ignore_case,
    })
}

/// The registration form as the target app renders it.
pub fn registration_page() -> MockBackend {
    let mut page = MockBackend::new();
    page.url = format!("{}/register", BASE_URL);

    let logo = page.add(node("a").attr("href", "/").attr("class", "logo-link").row(0));
    page.add(node("img").attr("alt", "SpeechPundit logo").inside(logo).row(0));

    let form = page.add(node("form").at(0.0, 50.0, 400.0, 800.0));
    for (row, (id, placeholder, kind)) in [
        ("firstName", "First Name", "text"),
        ("lastName", "Last Name", "text"),
        ("email", "Email", "email"),
        ("password", "Password", "password"),
    ]
    .into_iter()
    .enumerate()
    {
        page.add(
            node("input")
                .attr("id", id)
                .attr("name", id)
                .attr("type", kind)
                .attr("placeholder", placeholder)
                .inside(form)
                .row(row + 1),
        );
    }

    let control = page.add(
        node("div")
            .attr("class", "react-select__control")
            .attr("role", "combobox")
            .inside(form)
            .row(5),
    );
    let placeholder = page.add(
        node("span")
            .attr("class", "react-select__placeholder")
            .text("Select Organization")
            .inside(control)
            .row(5),
    );
    let menu = page.add(
        node("div")
            .attr("class", "react-select__menu")
            .inside(form)
            .at(0.0, 330.0, 300.0, 300.0)
            .hidden(),
    );
    let mut option_ids = Vec::new();
    for (i, org) in ORGANIZATIONS.iter().enumerate() {
        option_ids.push(page.add(
            node("div")
                .attr("class", "react-select__option")
                .attr("role", "option")
                .text(org)
                .inside(menu)
                .at(0.0, 330.0 + i as f32 * 40.0, 300.0, 30.0),
        ));
    }

    let roles = page.add(
        node("div")
            .attr("class", "role-group")
            .inside(form)
            .at(0.0, 660.0, 300.0, 40.0)
            .hidden(),
    );
    page.add(
        node("input")
            .attr("type", "radio")
            .attr("name", "role")
            .attr("id", "role-student")
            .attr("value", "Student")
            .inside(roles)
            .at(0.0, 665.0, 20.0, 20.0),
    );
    let student_label = page.add(
        node("label")
            .attr("for", "role-student")
            .text("Student")
            .inside(roles)
            .at(25.0, 665.0, 80.0, 20.0),
    );
    page.add(
        node("input")
            .attr("type", "radio")
            .attr("name", "role")
            .attr("id", "role-coach")
            .attr("value", "Coach")
            .inside(roles)
            .at(150.0, 665.0, 20.0, 20.0),
    );
    let coach_label = page.add(
        node("label")
            .attr("for", "role-coach")
            .text("Coach")
            .inside(roles)
            .at(175.0, 665.0, 80.0, 20.0),
    );

    for (option, org) in option_ids.iter().zip(ORGANIZATIONS) {
        let (student, coach) = if org == "Sails Software" {
            ("Sail'r", "Trainer")
        } else {
            ("Student", "Coach")
        };
        let effect = Effect::SelectOrganization {
            menu,
            roles,
            labels: vec![
                (student_label, student.to_string()),
                (coach_label, coach.to_string()),
                (placeholder, org.to_string()),
            ],
        };
        if let Some(node) = page.get_mut(*option) {
            node.on_click = effect;
        }
    }
    if let Some(node) = page.get_mut(control) {
        node.on_click = Effect::Show(menu);
    }

    page.add(
        node("input")
            .attr("type", "checkbox")
            .attr("id", "terms")
            .attr("name", "terms")
            .inside(form)
            .at(0.0, 720.0, 20.0, 20.0),
    );
    let terms_label = page.add(
        node("label")
            .attr("for", "terms")
            .text("I agree to the ")
            .inside(form)
            .at(25.0, 720.0, 300.0, 20.0),
    );
    let modal = page.add(
        node("div")
            .attr("role", "dialog")
            .attr("class", "modal")
            .at(100.0, 100.0, 600.0, 400.0)
            .hidden(),
    );
    page.add(
        node("a")
            .attr("href", "#terms")
            .text("terms and conditions.")
            .inside(terms_label)
            .at(130.0, 720.0, 150.0, 20.0)
            .on_click(Effect::Show(modal)),
    );
    page.add(
        node("h5")
            .attr("class", "modal-title")
            .text("Terms and Conditions")
            .inside(modal)
            .at(110.0, 110.0, 300.0, 30.0),
    );
    page.add(
        node("button")
            .attr("type", "button")
            .attr("aria-label", "Close")
            .text("Close")
            .inside(modal)
            .at(600.0, 110.0, 80.0, 30.0)
            .on_click(Effect::Hide(modal)),
    );

    let errors = page.add(node("div").attr("class", "errors").inside(form).row(13).hidden());
    for (i, message) in ["First Name is required", "Email is required"].iter().enumerate() {
        page.add(
            node("p")
                .text(message)
                .inside(errors)
                .at(0.0, 780.0 + i as f32 * 25.0, 300.0, 20.0),
        );
    }

    page.add(
        node("button")
            .attr("type", "submit")
            .text("Signup")
            .inside(form)
            .row(14)
            .on_click(Effect::Show(errors)),
    );
    page.add(
        node("a")
            .attr("href", "/login")
            .text("Login")
            .row(15)
            .on_click(Effect::Navigate(format!("{}/login", BASE_URL))),
    );

    page
}
