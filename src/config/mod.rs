//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config.yml (YAML, untrusted)
//!     → loader.rs (read from storage, parse)
//!     → validation.rs (structural checks, all issues at once)
//!     → normalize.rs (ordered groups, ids, tags.rs resolution)
//!     → merge.rs (deep merge over defaults)
//!     → CompleteConfig (immutable, fresh per load)
//!
//! Consumers:
//!     extract.rs → safe view for clients, id-keyed service index
//! ```
//!
//! # Design Decisions
//! - Loading never fails: errors become the default config plus `error`
//! - The two `services` shapes are reconciled right after validation
//! - Tag references are resolved once; downstream only sees concrete tags

pub mod extract;
pub mod loader;
pub mod merge;
pub mod normalize;
pub mod schema;
pub mod tags;
pub mod validation;

pub use extract::{extract_safely_config, extract_services_from_config};
pub use loader::{ConfigLoader, LoadError, CONFIG_FILE_NAME, SNAPSHOT_KEY};
pub use schema::{
    get_default_config, Behaviour, CompleteConfig, Icon, Service, ServiceGroup, ServiceStatus,
    Tag, DEFAULT_TAG_COLOR,
};
pub use validation::{validate_config_schema, SchemaError};
