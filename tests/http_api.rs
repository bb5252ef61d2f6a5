//! HTTP API tests, driving the router directly.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use homedash::config::{CompleteConfig, Service, CONFIG_FILE_NAME, SNAPSHOT_KEY};
use homedash::storage::MemoryStorage;
use homedash::{ConfigLoader, HttpServer};
use tower::ServiceExt;

mod common;

async fn server_for(
    document: &str,
    snapshot: Option<&CompleteConfig>,
) -> (Router, CompleteConfig) {
    let files = MemoryStorage::new();
    files.insert(CONFIG_FILE_NAME, document);
    let snapshots = MemoryStorage::new();
    if let Some(snapshot) = snapshot {
        snapshots.insert(SNAPSHOT_KEY, serde_json::to_string(snapshot).unwrap());
    }

    let loader = Arc::new(ConfigLoader::new(Arc::new(files), Arc::new(snapshots)));
    let config = loader.load_local_config().await;
    let server = HttpServer::new(config.clone(), loader, None);
    (server.router(), config)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_config_endpoint_hides_secrets() {
    let (router, config) = server_for(common::SAMPLE_CONFIG, None).await;
    let (status, body) = get(router, "/api/config").await;

    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(!text.contains("secrets"));
    assert!(!text.contains("hunter2"));

    let served: CompleteConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(served.title, config.title);
    assert_eq!(served.service_count(), config.service_count());
}

#[tokio::test]
async fn test_service_lookup() {
    let (router, config) = server_for(common::SAMPLE_CONFIG, None).await;
    let weather = config.services[1].items[1].clone();
    assert!(weather.secrets.is_some());

    let (status, body) = get(router.clone(), &format!("/api/services/{}", weather.id)).await;
    assert_eq!(status, StatusCode::OK);
    let served: Service = serde_json::from_slice(&body).unwrap();
    assert_eq!(served.id, weather.id);
    assert_eq!(served.title.as_deref(), Some("Weather"));
    assert!(served.secrets.is_none());

    let (status, _) = get(router, "/api/services/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_snapshot_endpoint() {
    let (router, _) = server_for(common::SAMPLE_CONFIG, None).await;
    let (status, _) = get(router, "/api/snapshot").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let snapshot = CompleteConfig {
        title: "Persisted".into(),
        ..CompleteConfig::default()
    };
    let (router, _) = server_for(common::SAMPLE_CONFIG, Some(&snapshot)).await;
    let (status, body) = get(router, "/api/snapshot").await;
    assert_eq!(status, StatusCode::OK);
    let served: CompleteConfig = serde_json::from_slice(&body).unwrap();
    assert_eq!(served, snapshot);
}

#[tokio::test]
async fn test_degraded_config_is_served() {
    let (router, config) = server_for("services: 12", None).await;
    assert!(config.error.is_some());

    let (status, body) = get(router, "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    let served: CompleteConfig = serde_json::from_slice(&body).unwrap();
    assert_eq!(served.error, config.error);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let (router, _) = server_for(common::SAMPLE_CONFIG, None).await;

    let (status, body) = get(router.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    // No recorder handle was given to this server.
    let (status, _) = get(router, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
