//! Configuration validation.
//!
//! # Responsibilities
//! - Gate structurally malformed documents before any normalization
//! - Report every failing field path, not just the first
//! - Render failures as a readable tree for the degraded result
//!
//! # Design Decisions
//! - Structural checks run over the generic parsed value, so a single pass can
//!   collect all issues (serde stops at the first one)
//! - Typed decoding into [`Document`] happens only after the checks pass
//! - Nothing is coerced: optional means absent, an explicit null is a type error
//! - Unknown keys are ignored

use std::fmt;

use serde_json::{Map, Value};

use crate::config::schema::{value_kind, Document};

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "(root): {}", self.message);
        }
        let path: Vec<String> = self.path.iter().map(ToString::to_string).collect();
        write!(f, "{}: {}", path.join("."), self.message)
    }
}

/// A document rejected by [`validate_config_schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub issues: Vec<Issue>,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid configuration: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

impl SchemaError {
    /// Issues arranged by field path. Each node lists its own reasons under
    /// `_errors`; nodes without failures are left out entirely.
    pub fn tree(&self) -> Value {
        let mut root = ReportNode::default();
        for issue in &self.issues {
            let mut node = &mut root;
            for segment in &issue.path {
                node = node.child(segment.to_string());
            }
            node.errors.push(issue.message.clone());
        }
        root.into_value()
    }

    /// Pretty-printed [`tree`](Self::tree), as shown to users.
    pub fn report(&self) -> String {
        serde_json::to_string_pretty(&self.tree()).unwrap_or_else(|_| self.to_string())
    }
}

#[derive(Debug, Default)]
struct ReportNode {
    errors: Vec<String>,
    children: Vec<(String, ReportNode)>,
}

impl ReportNode {
    fn child(&mut self, key: String) -> &mut ReportNode {
        let index = match self.children.iter().position(|(k, _)| *k == key) {
            Some(index) => index,
            None => {
                self.children.push((key, ReportNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[index].1
    }

    fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.children.iter().all(|(_, child)| child.is_empty())
    }

    fn into_value(self) -> Value {
        let mut map = Map::new();
        if !self.errors.is_empty() {
            map.insert(
                "_errors".to_string(),
                Value::Array(self.errors.into_iter().map(Value::String).collect()),
            );
        }
        for (key, child) in self.children {
            if !child.is_empty() {
                map.insert(key, child.into_value());
            }
        }
        Value::Object(map)
    }
}

/// Validate a parsed document and decode it.
pub fn validate_config_schema(raw: &Value) -> Result<Document, SchemaError> {
    let mut checker = Checker::default();
    checker.root(raw);
    if !checker.issues.is_empty() {
        return Err(SchemaError {
            issues: checker.issues,
        });
    }

    serde_json::from_value(raw.clone()).map_err(|e| SchemaError {
        issues: vec![Issue {
            path: Vec::new(),
            message: e.to_string(),
        }],
    })
}

#[derive(Debug, Clone, Copy)]
enum Expect {
    String,
    Boolean,
    Number,
    Object,
    Array,
}

impl Expect {
    fn name(self) -> &'static str {
        match self {
            Expect::String => "string",
            Expect::Boolean => "boolean",
            Expect::Number => "number",
            Expect::Object => "object",
            Expect::Array => "array",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Expect::String, Value::String(_))
                | (Expect::Boolean, Value::Bool(_))
                | (Expect::Number, Value::Number(_))
                | (Expect::Object, Value::Object(_))
                | (Expect::Array, Value::Array(_))
        )
    }
}

fn join(path: &[PathSegment], segment: impl Into<PathSegment>) -> Vec<PathSegment> {
    let mut path = path.to_vec();
    path.push(segment.into());
    path
}

const SERVICE_STRINGS: [&str; 5] = ["title", "description", "link", "target", "type"];
const ICON_STRINGS: [&str; 4] = ["url", "name", "background", "color"];

#[derive(Default)]
struct Checker {
    issues: Vec<Issue>,
}

impl Checker {
    fn issue(&mut self, path: Vec<PathSegment>, message: impl Into<String>) {
        self.issues.push(Issue {
            path,
            message: message.into(),
        });
    }

    fn mismatch(&mut self, path: Vec<PathSegment>, expected: &str, found: &Value) {
        self.issue(
            path,
            format!("Expected {}, received {}", expected, value_kind(found)),
        );
    }

    /// Check an optional field; returns it only when present and well-typed.
    fn optional<'v>(
        &mut self,
        path: &[PathSegment],
        map: &'v Map<String, Value>,
        key: &str,
        expect: Expect,
    ) -> Option<&'v Value> {
        let value = map.get(key)?;
        if expect.accepts(value) {
            Some(value)
        } else {
            self.mismatch(join(path, key), expect.name(), value);
            None
        }
    }

    fn optional_object<'v>(
        &mut self,
        path: &[PathSegment],
        map: &'v Map<String, Value>,
        key: &str,
    ) -> Option<&'v Map<String, Value>> {
        self.optional(path, map, key, Expect::Object)
            .and_then(Value::as_object)
    }

    fn optional_array<'v>(
        &mut self,
        path: &[PathSegment],
        map: &'v Map<String, Value>,
        key: &str,
    ) -> Option<&'v Vec<Value>> {
        self.optional(path, map, key, Expect::Array)
            .and_then(Value::as_array)
    }

    fn root(&mut self, raw: &Value) {
        let Some(root) = raw.as_object() else {
            self.mismatch(Vec::new(), "object", raw);
            return;
        };

        for key in ["title", "lang", "theme"] {
            self.optional(&[], root, key, Expect::String);
        }
        self.optional(&[], root, "checkUpdates", Expect::Boolean);

        if let Some(behaviour) = self.optional_object(&[], root, "behaviour") {
            self.optional(&join(&[], "behaviour"), behaviour, "target", Expect::String);
        }

        if let Some(tags) = self.optional_array(&[], root, "tags") {
            let path = join(&[], "tags");
            for (i, tag) in tags.iter().enumerate() {
                self.tag(join(&path, i), tag);
            }
        }

        let path = join(&[], "services");
        match root.get("services") {
            None => self.issue(path, "Required"),
            Some(Value::Array(items)) => self.service_list(&path, items),
            Some(Value::Object(groups)) => {
                for (title, items) in groups {
                    let group_path = join(&path, title.as_str());
                    match items {
                        Value::Array(items) => self.service_list(&group_path, items),
                        other => self.mismatch(group_path, "array", other),
                    }
                }
            }
            Some(other) => self.mismatch(path, "array or object", other),
        }
    }

    fn tag(&mut self, path: Vec<PathSegment>, value: &Value) {
        let Some(tag) = value.as_object() else {
            self.mismatch(path, "object", value);
            return;
        };
        for key in ["name", "color"] {
            match tag.get(key) {
                None => self.issue(join(&path, key), "Required"),
                Some(Value::String(_)) => {}
                Some(other) => self.mismatch(join(&path, key), "string", other),
            }
        }
    }

    fn service_list(&mut self, path: &[PathSegment], items: &[Value]) {
        for (i, item) in items.iter().enumerate() {
            self.service(join(path, i), item);
        }
    }

    fn service(&mut self, path: Vec<PathSegment>, value: &Value) {
        let Some(service) = value.as_object() else {
            self.mismatch(path, "object", value);
            return;
        };

        for key in SERVICE_STRINGS {
            self.optional(&path, service, key, Expect::String);
        }

        if let Some(icon) = self.optional_object(&path, service, "icon") {
            let icon_path = join(&path, "icon");
            for key in ICON_STRINGS {
                self.optional(&icon_path, icon, key, Expect::String);
            }
            self.optional(&icon_path, icon, "wrap", Expect::Boolean);
        }

        if let Some(status) = self.optional_object(&path, service, "status") {
            let status_path = join(&path, "status");
            self.optional(&status_path, status, "enabled", Expect::Boolean);
            self.optional(&status_path, status, "interval", Expect::Number);
        }

        self.optional(&path, service, "options", Expect::Object);
        self.optional(&path, service, "secrets", Expect::Object);

        if let Some(tags) = self.optional_array(&path, service, "tags") {
            let tags_path = join(&path, "tags");
            for (i, tag) in tags.iter().enumerate() {
                match tag {
                    Value::String(_) => {}
                    Value::Object(_) => self.tag(join(&tags_path, i), tag),
                    other => self.mismatch(join(&tags_path, i), "string or tag object", other),
                }
            }
        }
    }
}
