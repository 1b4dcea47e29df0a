//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure of a cedar
//! deployment. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::serialize::DEFAULT_INDENT;
use crate::spec::LoggerSpec;
use crate::wire::CodecKind;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CedarConfig {
    /// Diagnostics of cedar itself.
    pub observability: ObservabilityConfig,

    /// Wire encoding between workers and the coordinator.
    pub wire: WireConfig,

    /// Argument formatting.
    pub serializer: SerializerConfig,

    /// Worker processes.
    pub workers: WorkersConfig,

    /// Logger groups, each one aggregate logger.
    pub loggers: Vec<LoggerGroupConfig>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level of cedar's own diagnostics (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}

/// Wire configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WireConfig {
    /// `framed` (fixed-width prefix) or `record` (tagged JSON).
    pub codec: CodecKind,
}

/// Serializer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Default indentation for transports without an `indent` option.
    pub indent: String,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
        }
    }
}

/// Worker process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkersConfig {
    /// Number of worker processes the coordinator spawns.
    pub count: u32,

    /// Demo calls each worker emits per logger group.
    pub messages: u32,
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            count: 2,
            messages: 3,
        }
    }
}

/// One logger group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggerGroupConfig {
    /// Group name, for diagnostics.
    pub name: String,

    /// Transport descriptors, in order.
    pub transports: LoggerSpec,
}
