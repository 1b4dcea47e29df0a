//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CedarConfig (validated, immutable)
//!     → read by coordinator and every worker
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; logger identities depend on it, so
//!   there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Coordinator and workers load the same file, so they derive the same
//!   identities

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CedarConfig, LoggerGroupConfig, ObservabilityConfig, SerializerConfig, WireConfig,
    WorkersConfig,
};
pub use validation::{validate_config, ValidationError};
