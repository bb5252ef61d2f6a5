//! Configuration schema definitions.
//!
//! Two families of types live here:
//! - the validated input [`Document`], which still carries the loose shapes a
//!   user may write (`services` as list or mapping, tags by name or inline);
//! - the canonical [`CompleteConfig`] handed to the rest of the application.
//!
//! All types derive Serde traits. Output types skip absent optionals when
//! serialized so that merging and redaction operate on present fields only.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Color given to a tag that is referenced by name but never declared.
pub const DEFAULT_TAG_COLOR: &str = "blue";

/// A named, colored label attached to services.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Tag {
    pub name: String,
    pub color: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Service icon settings.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Icon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Availability check settings for a service.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Probe interval in seconds, kept as written (`30` stays an integer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<Number>,
}

/// A linked service shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Service {
    /// Identifier generated at load time. Never written back to the document.
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Link target (e.g. "_blank"); falls back to `behaviour.target` when rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,

    /// Integration type (e.g. "ip-api", "weather").
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,

    /// Server-side only. Removed by [`crate::config::extract_safely_config`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Map<String, Value>>,

    pub tags: Vec<Tag>,
}

/// An ordered collection of services displayed together.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceGroup {
    /// `None` for the single group produced from a flat service list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub items: Vec<Service>,
}

/// Link-opening behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Behaviour {
    pub target: String,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            target: "_blank".to_string(),
        }
    }
}

/// Root configuration after validation, normalization and defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompleteConfig {
    pub title: String,
    pub lang: String,
    pub theme: String,
    pub check_updates: bool,
    pub behaviour: Behaviour,
    pub tags: Vec<Tag>,

    /// Always the ordered-groups representation, whatever the document used.
    pub services: Vec<ServiceGroup>,

    /// Set only on a degraded result: everything else is then the default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for CompleteConfig {
    fn default() -> Self {
        Self {
            title: "Home Dashboard".to_string(),
            lang: "en".to_string(),
            theme: "system".to_string(),
            check_updates: true,
            behaviour: Behaviour::default(),
            tags: Vec::new(),
            services: Vec::new(),
            error: None,
        }
    }
}

impl CompleteConfig {
    /// The default configuration carrying a failure description.
    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Total number of services across all groups.
    pub fn service_count(&self) -> usize {
        self.services.iter().map(|group| group.items.len()).sum()
    }
}

/// Returns a fresh copy of the built-in default configuration.
pub fn get_default_config() -> CompleteConfig {
    CompleteConfig::default()
}

// ---------------------------------------------------------------------------
// Validated input document
// ---------------------------------------------------------------------------

/// A validated configuration document, before normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub check_updates: Option<bool>,
    #[serde(default)]
    pub behaviour: Option<PartialBehaviour>,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
    pub services: ServicesInput,
}

/// `behaviour` as written in a document: every key optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PartialBehaviour {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// The two accepted shapes of `services`.
#[derive(Debug, Clone, PartialEq)]
pub enum ServicesInput {
    /// A flat list of services.
    List(Vec<DocumentService>),
    /// Group title → services, in declared order.
    Groups(Vec<(String, Vec<DocumentService>)>),
}

impl<'de> Deserialize<'de> for ServicesInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => decode_services(items)
                .map(ServicesInput::List)
                .map_err(de::Error::custom),
            Value::Object(groups) => groups
                .into_iter()
                .map(|(title, items)| {
                    let items = match items {
                        Value::Array(items) => decode_services(items)?,
                        other => serde_json::from_value(other)?,
                    };
                    Ok((title, items))
                })
                .collect::<Result<Vec<_>, serde_json::Error>>()
                .map(ServicesInput::Groups)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected a list or a mapping of services, found {}",
                value_kind(&other)
            ))),
        }
    }
}

fn decode_services(items: Vec<Value>) -> Result<Vec<DocumentService>, serde_json::Error> {
    items.into_iter().map(serde_json::from_value).collect()
}

/// A service as written in a document: no id yet, tags unresolved.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DocumentService {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub target: Option<String>,
    pub icon: Option<Icon>,
    pub status: Option<ServiceStatus>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub options: Option<Map<String, Value>>,
    pub secrets: Option<Map<String, Value>>,
    pub tags: Vec<TagRef>,
}

/// A tag reference: a declared tag's name, or a tag written inline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagRef {
    Name(String),
    Inline(Tag),
}

/// JSON-ish type name of a value, as used in validation messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
