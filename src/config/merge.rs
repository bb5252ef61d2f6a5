//! Deep merge of a normalized document over the built-in defaults.
//!
//! Merge rule:
//! - object over object: merged key by key, recursively
//! - null over anything: the base value is kept
//! - anything else (arrays included): the overlay replaces the base wholesale
//!
//! Arrays are never merged element-wise or concatenated; `tags` and `services`
//! from a document replace the default lists.

use serde_json::Value;

use crate::config::normalize::NormalizedDocument;
use crate::config::schema::CompleteConfig;

/// Merge `overlay` over `base`, returning a new value. Neither input is modified.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let next = match base_map.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (base, Value::Null) => base.clone(),
        (_, overlay) => overlay.clone(),
    }
}

/// Apply `defaults` to every field the document leaves out.
pub fn merge_with_defaults(
    document: &NormalizedDocument,
    defaults: &CompleteConfig,
) -> Result<CompleteConfig, serde_json::Error> {
    let base = serde_json::to_value(defaults)?;
    let overlay = serde_json::to_value(document)?;
    serde_json::from_value(deep_merge(&base, &overlay))
}
