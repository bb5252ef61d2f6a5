//! Views derived from a loaded configuration.
//!
//! - [`extract_safely_config`]: copy with secret-bearing fields removed, for
//!   untrusted clients
//! - [`extract_services_from_config`]: services keyed by identifier

use std::collections::HashMap;

use serde_json::Value;

use crate::config::schema::{CompleteConfig, Service};

/// Name of the fields stripped from safe views.
pub const SECRETS_KEY: &str = "secrets";

/// Deep copy of `config` without any `secrets` field, at any depth.
pub fn extract_safely_config(config: &CompleteConfig) -> CompleteConfig {
    let mut safe = config.clone();
    for group in &mut safe.services {
        for service in &mut group.items {
            redact_service(service);
        }
    }
    safe
}

/// Remove `secrets` from a single service, including keys nested in `options`.
pub fn redact_service(service: &mut Service) {
    service.secrets = None;
    if let Some(options) = service.options.as_mut() {
        options.retain(|key, _| key != SECRETS_KEY);
        options.values_mut().for_each(strip_secrets);
    }
}

/// Remove every `secrets` key from a generic value, recursively.
pub fn strip_secrets(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| key != SECRETS_KEY);
            map.values_mut().for_each(strip_secrets);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_secrets),
        _ => {}
    }
}

/// Index every service by id. Groups and items are visited in order; a
/// repeated id keeps the later service.
pub fn extract_services_from_config(config: &CompleteConfig) -> HashMap<String, Service> {
    config
        .services
        .iter()
        .flat_map(|group| group.items.iter())
        .map(|service| (service.id.clone(), service.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ServiceGroup;
    use serde_json::json;

    fn service(id: &str, title: &str) -> Service {
        Service {
            id: id.to_string(),
            title: Some(title.to_string()),
            ..Service::default()
        }
    }

    fn config_with_secrets() -> CompleteConfig {
        let mut secret = service("a", "Weather");
        secret.secrets = Some(json!({ "apiKey": "hunter2" }).as_object().unwrap().clone());
        secret.options = Some(
            json!({
                "city": "Oslo",
                "secrets": { "token": "t" },
                "nested": [{ "secrets": 1, "keep": 2 }]
            })
            .as_object()
            .unwrap()
            .clone(),
        );

        CompleteConfig {
            services: vec![
                ServiceGroup {
                    title: Some("Home".into()),
                    items: vec![secret, service("b", "Plain")],
                },
                ServiceGroup {
                    title: None,
                    items: vec![service("c", "Other")],
                },
            ],
            ..CompleteConfig::default()
        }
    }

    #[test]
    fn test_safe_view_has_no_secrets() {
        let config = config_with_secrets();
        let safe = extract_safely_config(&config);

        let serialized = serde_json::to_string(&safe).unwrap();
        assert!(!serialized.contains("\"secrets\""));
        assert!(!serialized.contains("hunter2"));

        let options = safe.services[0].items[0].options.as_ref().unwrap();
        assert_eq!(options["city"], json!("Oslo"));
        assert_eq!(options["nested"], json!([{ "keep": 2 }]));
    }

    #[test]
    fn test_safe_view_leaves_input_untouched() {
        let config = config_with_secrets();
        let before = config.clone();
        let safe = extract_safely_config(&config);

        assert_eq!(config, before);
        assert!(config.services[0].items[0].secrets.is_some());
        assert_eq!(safe.services[0].items[1], config.services[0].items[1]);
        assert_eq!(safe.title, config.title);
    }

    #[test]
    fn test_strip_secrets_any_depth() {
        let mut value = json!({ "secrets": 1, "a": { "b": [{ "secrets": { "x": 1 }, "c": 3 }] } });
        strip_secrets(&mut value);
        assert_eq!(value, json!({ "a": { "b": [{ "c": 3 }] } }));
    }

    #[test]
    fn test_service_index() {
        let config = config_with_secrets();
        let index = extract_services_from_config(&config);

        assert_eq!(index.len(), 3);
        assert_eq!(index["a"], config.services[0].items[0]);
        assert_eq!(index["b"], config.services[0].items[1]);
        assert_eq!(index["c"], config.services[1].items[0]);
    }

    #[test]
    fn test_service_index_last_write_wins() {
        let config = CompleteConfig {
            services: vec![
                ServiceGroup {
                    title: None,
                    items: vec![service("dup", "first")],
                },
                ServiceGroup {
                    title: None,
                    items: vec![service("dup", "second")],
                },
            ],
            ..CompleteConfig::default()
        };
        let index = extract_services_from_config(&config);
        assert_eq!(index.len(), 1);
        assert_eq!(index["dup"].title.as_deref(), Some("second"));
    }
}
