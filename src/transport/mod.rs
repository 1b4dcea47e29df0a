//! Output transports.
//!
//! # Data Flow
//! ```text
//! TransportConfig (normalized descriptor)
//!     → TransportFactory::create
//!     → Box<dyn Sink> (console / file / memory)
//!     → wrapped by LeafLogger (level filter + argument formatting)
//! ```
//!
//! # Design Decisions
//! - Construction errors are returned (startup is fail fast)
//! - Write errors are swallowed; logging never crashes the caller

pub mod console;
pub mod file;
pub mod memory;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use memory::{MemoryEntry, MemorySink};

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use crate::logger::Level;
use crate::spec::TransportConfig;

/// Transport names understood by [`StandardTransports`].
pub const KNOWN_TRANSPORTS: &[&str] = &["console", "file", "memory"];

/// Errors raised while building a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport #{index}: unknown transport `{name}`")]
    Unknown { index: usize, name: String },

    #[error("transport #{index}: `{transport}` requires the `{option}` option")]
    MissingOption {
        index: usize,
        transport: String,
        option: &'static str,
    },

    #[error("transport #{index}: failed to open {path}: {source}")]
    Open {
        index: usize,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Final destination of formatted messages.
pub trait Sink: Send + Sync {
    /// Write one formatted message. Must not panic.
    fn write(&self, level: Level, message: &str);
}

/// Builds one sink per transport descriptor.
pub trait TransportFactory: Send + Sync {
    fn create(&self, config: &TransportConfig) -> Result<Box<dyn Sink>, TransportError>;
}

/// The built-in transports.
#[derive(Debug, Default)]
pub struct StandardTransports {
    memory: Mutex<Vec<MemorySink>>,
}

impl StandardTransports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `memory` sink created so far, in creation order.
    pub fn memory_sinks(&self) -> Vec<MemorySink> {
        lock(&self.memory).clone()
    }
}

impl TransportFactory for StandardTransports {
    fn create(&self, config: &TransportConfig) -> Result<Box<dyn Sink>, TransportError> {
        match config.transport.as_str() {
            "console" => Ok(Box::new(ConsoleSink)),
            "file" => {
                let path = config.option_str("path").ok_or_else(|| TransportError::MissingOption {
                    index: config.index,
                    transport: config.transport.clone(),
                    option: "path",
                })?;
                let sink = FileSink::open(path).map_err(|source| TransportError::Open {
                    index: config.index,
                    path: path.to_string(),
                    source,
                })?;
                Ok(Box::new(sink))
            }
            "memory" => {
                let sink = MemorySink::new();
                lock(&self.memory).push(sink.clone());
                Ok(Box::new(sink))
            }
            other => Err(TransportError::Unknown {
                index: config.index,
                name: other.to_string(),
            }),
        }
    }
}

/// `LEVEL: message`, the line format of console and file transports.
pub fn format_line(level: Level, message: &str) -> String {
    format!("{}: {}", level.as_str().to_uppercase(), message)
}

/// Lock ignoring poisoning; a panicked writer must not silence logging.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{TransportConfig, TransportDescriptor};
    use serde_json::json;

    fn config(value: serde_json::Value) -> TransportConfig {
        let descriptor: TransportDescriptor = serde_json::from_value(value).unwrap();
        TransportConfig::from_descriptor(0, &descriptor).unwrap()
    }

    #[test]
    fn formats_uppercase_level_prefix() {
        assert_eq!(format_line(Level::Warn, "careful"), "WARN: careful");
    }

    #[test]
    fn creates_known_transports() {
        let factory = StandardTransports::new();
        assert!(factory.create(&config(json!("console"))).is_ok());
        assert!(factory.create(&config(json!("memory"))).is_ok());
        assert_eq!(factory.memory_sinks().len(), 1);
    }

    #[test]
    fn rejects_unknown_transport() {
        let err = StandardTransports::new()
            .create(&config(json!("carrier-pigeon")))
            .err()
            .unwrap();
        assert!(matches!(err, TransportError::Unknown { ref name, .. } if name == "carrier-pigeon"));
    }

    #[test]
    fn file_requires_path() {
        let err = StandardTransports::new()
            .create(&config(json!({"transport": "file"})))
            .err()
            .unwrap();
        assert!(matches!(err, TransportError::MissingOption { option: "path", .. }));
    }
}
