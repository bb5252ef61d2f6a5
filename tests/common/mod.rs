//! Shared fixtures for integration tests.

use std::sync::{Arc, Mutex};

use homedash::config::{ConfigLoader, LoadError, CONFIG_FILE_NAME};
use homedash::observability::ErrorReporter;
use homedash::storage::MemoryStorage;

/// Reporter that remembers the kind of every reported failure.
#[derive(Default)]
pub struct RecordingReporter {
    pub kinds: Mutex<Vec<&'static str>>,
}

#[allow(dead_code)]
impl RecordingReporter {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.kinds.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &LoadError) {
        self.kinds.lock().unwrap().push(error.kind());
    }
}

#[allow(dead_code)]
/// Loader over in-memory storage, optionally seeded with a YAML document.
pub fn loader_with(document: Option<&str>) -> (ConfigLoader, Arc<RecordingReporter>) {
    let files = MemoryStorage::new();
    if let Some(document) = document {
        files.insert(CONFIG_FILE_NAME, document);
    }
    let reporter = Arc::new(RecordingReporter::default());
    let loader = ConfigLoader::new(Arc::new(files), Arc::new(MemoryStorage::new()))
        .with_reporter(reporter.clone());
    (loader, reporter)
}

#[allow(dead_code)]
pub const SAMPLE_CONFIG: &str = r#"
title: Homelab
theme: dark
tags:
  - name: media
    color: purple
  - name: infra
    color: red
services:
  Media:
    - title: Jellyfin
      link: https://jellyfin.lan
      tags: [media, new]
      icon:
        name: simple-icons:jellyfin
        wrap: true
  Infra:
    - title: Router
      type: ping
      status:
        enabled: true
        interval: 30
      tags:
        - infra
        - name: lan
          color: green
    - title: Weather
      type: weather
      options:
        city: Oslo
      secrets:
        apiKey: hunter2
"#;
