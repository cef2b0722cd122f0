//! A small retained element tree.
//!
//! Hosts own the tree and hand the widget a [`NodeRef`] to render into.
//! Elements carry attributes, classes, inline style, text and the ids of the
//! listeners attached to them; the widget keeps its own record of which
//! listener ids it added so it can remove exactly those.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::SelectorError;

/// Shared handle to an element. The container handed to the widget is one
/// of these and stays owned by the host.
pub type NodeRef = Rc<RefCell<Element>>;

/// Elements that never have children or a closing tag.
const VOID_TAGS: &[&str] = &["input", "br", "img", "hr", "meta", "link"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Input,
    KeyPress,
    Click,
}

/// An event delivered by the host to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    Input { value: String },
    KeyPress { key: String },
    Click,
}

impl DomEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Input { .. } => EventKind::Input,
            Self::KeyPress { .. } => EventKind::KeyPress,
            Self::Click => EventKind::Click,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Allocate a process-unique listener id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Default, Clone)]
pub struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    text: String,
    children: Vec<NodeRef>,
    listeners: Vec<(ListenerId, EventKind)>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    // ---- Builder ----

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_style(property, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child.into_ref());
        self
    }

    pub fn into_ref(self) -> NodeRef {
        Rc::new(RefCell::new(self))
    }

    // ---- Accessors ----

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.style.insert(property.into(), value.into());
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Drop the current subtree and install `children` in its place.
    /// Listeners attached inside the old subtree go with it.
    pub fn replace_children(&mut self, children: Vec<NodeRef>) {
        self.children = children;
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    // ---- Listeners ----

    pub fn add_listener(&mut self, kind: EventKind) -> ListenerId {
        let id = ListenerId::next();
        self.listeners.push((id, kind));
        id
    }

    /// Returns whether the listener was attached to this element.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    pub fn listeners_for(&self, kind: EventKind) -> impl Iterator<Item = ListenerId> + '_ {
        self.listeners
            .iter()
            .filter(move |(_, k)| *k == kind)
            .map(|(id, _)| *id)
    }

    pub fn has_listener(&self, kind: EventKind) -> bool {
        self.listeners_for(kind).next().is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ---- Serialization ----

    /// Serialize this element and its subtree as HTML. Text and attribute
    /// values are escaped.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.borrow().write_html(&mut out);
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if !self.classes.is_empty() {
            push_attr(out, "class", &self.classes.join(" "));
        }
        for (name, value) in &self.attrs {
            push_attr(out, name, value);
        }
        if !self.style.is_empty() {
            let style = self
                .style
                .iter()
                .map(|(k, v)| format!("{k}: {v};"))
                .collect::<Vec<_>>()
                .join(" ");
            push_attr(out, "style", &style);
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            child.borrow().write_html(out);
        }
        out.push_str(&escape(&self.text));
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    fn matches(&self, selector: &Selector) -> bool {
        if let Some(tag) = &selector.tag {
            if !self.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &selector.id {
            if self.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !selector.classes.iter().all(|c| self.has_class(c)) {
            return false;
        }
        selector.attrs.iter().all(|(name, value)| match value {
            Some(value) => self.attr(name) == Some(value.as_str()),
            None => self.attrs.contains_key(name),
        })
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A compound selector without combinators: `tag`, `#id`, `.class`,
/// `[attr]` and `[attr="value"]`, in any combination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Selector {
    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attrs: vec![(name.into(), Some(value.into()))],
            ..Self::default()
        }
    }

    pub fn data_role(role: &str) -> Self {
        Self::attr_eq("data-role", role)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut selector = Self::default();
        let is_delim = |c: char| matches!(c, '#' | '.' | '[');

        let tag_end = s.find(is_delim).unwrap_or(s.len());
        if tag_end > 0 {
            selector.tag = Some(ident(&s[..tag_end])?.to_string());
        }

        let mut rest = &s[tag_end..];
        while let Some(c) = rest.chars().next() {
            match c {
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body.find(is_delim).unwrap_or(body.len());
                    let name = ident(&body[..end])?.to_string();
                    if c == '#' {
                        selector.id = Some(name);
                    } else {
                        selector.classes.push(name);
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let close = rest.find(']').ok_or(SelectorError::UnterminatedAttribute)?;
                    let inner = &rest[1..close];
                    let (name, value) = match inner.split_once('=') {
                        Some((name, value)) => (name, Some(unquote(value.trim()))),
                        None => (inner, None),
                    };
                    selector
                        .attrs
                        .push((ident(name.trim())?.to_string(), value.map(str::to_string)));
                    rest = &rest[close + 1..];
                }
                _ => return Err(SelectorError::Unsupported(rest.to_string())),
            }
        }

        Ok(selector)
    }
}

fn ident(s: &str) -> Result<&str, SelectorError> {
    let valid = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(s)
    } else {
        Err(SelectorError::Unsupported(s.to_string()))
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(s)
}

/// First descendant of `root` (depth-first, document order) matching
/// `selector`. `root` itself is not considered.
pub fn query_selector(root: &NodeRef, selector: &Selector) -> Option<NodeRef> {
    let element = root.borrow();
    for child in element.children() {
        if child.borrow().matches(selector) {
            return Some(Rc::clone(child));
        }
        if let Some(found) = query_selector(child, selector) {
            return Some(found);
        }
    }
    None
}

pub fn query_selector_all(root: &NodeRef, selector: &Selector) -> Vec<NodeRef> {
    let mut found = Vec::new();
    collect_matches(root, selector, &mut found);
    found
}

fn collect_matches(root: &NodeRef, selector: &Selector, found: &mut Vec<NodeRef>) {
    for child in root.borrow().children() {
        if child.borrow().matches(selector) {
            found.push(Rc::clone(child));
        }
        collect_matches(child, selector, found);
    }
}
