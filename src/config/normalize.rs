//! Service normalization.
//!
//! # Responsibilities
//! - Reconcile the list and mapping shapes of `services` into ordered groups
//! - Assign every service a fresh identifier
//! - Resolve tag references
//!
//! Nothing downstream of this module sees [`ServicesInput`] or [`TagRef`].
//!
//! [`TagRef`]: crate::config::schema::TagRef

use serde::Serialize;
use uuid::Uuid;

use crate::config::schema::{
    Document, DocumentService, PartialBehaviour, Service, ServiceGroup, ServicesInput, Tag,
};
use crate::config::tags::TagLookup;

/// A validated document with `services` in canonical form.
///
/// Absent fields stay absent when serialized, so the defaults merge keeps the
/// default's value for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_updates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behaviour: Option<PartialBehaviour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    pub services: Vec<ServiceGroup>,
}

/// Normalize a whole document.
pub fn normalize_document(document: Document) -> NormalizedDocument {
    let lookup = TagLookup::from_declared(document.tags.as_deref().unwrap_or_default());
    let services = normalize_services(document.services, &lookup);

    NormalizedDocument {
        title: document.title,
        lang: document.lang,
        theme: document.theme,
        check_updates: document.check_updates,
        behaviour: document.behaviour,
        tags: document.tags,
        services,
    }
}

/// Convert either `services` shape into ordered groups.
///
/// A list becomes a single untitled group; a mapping becomes one group per
/// entry, titled by its key, in declared order.
pub fn normalize_services(input: ServicesInput, lookup: &TagLookup) -> Vec<ServiceGroup> {
    match input {
        ServicesInput::List(items) => vec![ServiceGroup {
            title: None,
            items: normalize_items(items, lookup),
        }],
        ServicesInput::Groups(groups) => groups
            .into_iter()
            .map(|(title, items)| ServiceGroup {
                title: Some(title),
                items: normalize_items(items, lookup),
            })
            .collect(),
    }
}

fn normalize_items(items: Vec<DocumentService>, lookup: &TagLookup) -> Vec<Service> {
    items
        .into_iter()
        .map(|item| normalize_service(item, lookup))
        .collect()
}

fn normalize_service(item: DocumentService, lookup: &TagLookup) -> Service {
    Service {
        id: Uuid::new_v4().to_string(),
        title: item.title,
        description: item.description,
        link: item.link,
        target: item.target,
        icon: item.icon,
        status: item.status,
        kind: item.kind,
        options: item.options,
        secrets: item.secrets,
        tags: lookup.resolve_all(item.tags),
    }
}
