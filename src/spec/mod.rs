//! Logger specifications.
//!
//! A [`LoggerSpec`] is the ordered list of transport descriptors a logger
//! group is built from. Each descriptor is either a bare transport name or an
//! option record with at least a `transport` field:
//!
//! ```text
//! ["console", {"transport": "file", "path": "app.log", "worker": 2}]
//! ```
//!
//! The spec is hashed as given (see [`crate::identity`]), then each
//! descriptor is normalized into a [`TransportConfig`] for the transport
//! factory.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::worker::WorkerId;

/// Transport used when a record omits the `transport` field.
pub const DEFAULT_TRANSPORT: &str = "console";

/// Option key holding the worker affinity of a transport.
pub const WORKER_OPTION: &str = "worker";

/// Errors raised while normalizing a descriptor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SpecError {
    #[error("transport #{index}: `transport` must be a string, got {value}")]
    InvalidTransport { index: usize, value: JsonValue },

    #[error("transport #{index}: `worker` must be a positive integer, got {value}")]
    InvalidWorker { index: usize, value: JsonValue },
}

/// One element of a logger spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransportDescriptor {
    /// Shorthand: just the transport name.
    Name(String),
    /// Full record: `{transport: name, ...options}`.
    Options(Map<String, JsonValue>),
}

impl From<&str> for TransportDescriptor {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for TransportDescriptor {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Map<String, JsonValue>> for TransportDescriptor {
    fn from(options: Map<String, JsonValue>) -> Self {
        Self::Options(options)
    }
}

/// Ordered sequence of transport descriptors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoggerSpec(Vec<TransportDescriptor>);

impl LoggerSpec {
    pub fn new(descriptors: Vec<TransportDescriptor>) -> Self {
        Self(descriptors)
    }

    pub fn descriptors(&self) -> &[TransportDescriptor] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact JSON with keys in insertion order.
    pub fn canonical_json(&self) -> String {
        // Serializing string-keyed JSON maps cannot fail.
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    /// Normalize every descriptor, in spec order.
    pub fn normalize(&self) -> Result<Vec<TransportConfig>, SpecError> {
        self.0
            .iter()
            .enumerate()
            .map(|(index, descriptor)| TransportConfig::from_descriptor(index, descriptor))
            .collect()
    }
}

impl<T: Into<TransportDescriptor>> FromIterator<T> for LoggerSpec {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A descriptor after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    /// Position within the spec.
    pub index: usize,
    /// Transport name (`console`, `file`, ...).
    pub transport: String,
    /// Only accept messages from this worker; `None` accepts every worker.
    pub worker: Option<WorkerId>,
    /// Every option of the record, `transport` and `worker` included.
    pub options: Map<String, JsonValue>,
}

impl TransportConfig {
    pub fn from_descriptor(index: usize, descriptor: &TransportDescriptor) -> Result<Self, SpecError> {
        let options = match descriptor {
            TransportDescriptor::Name(name) => {
                let mut options = Map::new();
                options.insert("transport".to_string(), JsonValue::String(name.clone()));
                options
            }
            TransportDescriptor::Options(options) => options.clone(),
        };

        let transport = match options.get("transport") {
            None | Some(JsonValue::Null) => DEFAULT_TRANSPORT.to_string(),
            Some(JsonValue::String(name)) => name.clone(),
            Some(other) => {
                return Err(SpecError::InvalidTransport {
                    index,
                    value: other.clone(),
                })
            }
        };

        let worker = match options.get(WORKER_OPTION) {
            None | Some(JsonValue::Null) => None,
            Some(value) => Some(parse_worker(value).ok_or_else(|| SpecError::InvalidWorker {
                index,
                value: value.clone(),
            })?),
        };

        Ok(Self {
            index,
            transport,
            worker,
            options,
        })
    }

    /// String option, if present and a string.
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(JsonValue::as_str)
    }
}

fn parse_worker(value: &JsonValue) -> Option<WorkerId> {
    let raw = match value {
        JsonValue::Number(n) => n.as_u64()?,
        JsonValue::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    let raw = u32::try_from(raw).ok().filter(|id| *id > 0)?;
    Some(WorkerId::new(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(value: JsonValue) -> LoggerSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn deserializes_mixed_descriptors() {
        let s = spec(json!(["console", {"transport": "file", "path": "x.log"}]));
        assert_eq!(s.len(), 2);
        assert_eq!(s.descriptors()[0], TransportDescriptor::Name("console".into()));
        assert!(matches!(s.descriptors()[1], TransportDescriptor::Options(_)));
    }

    #[test]
    fn canonical_json_keeps_insertion_order() {
        let s = spec(json!([{"transport": "file", "path": "x.log", "level": "warn"}]));
        assert_eq!(
            s.canonical_json(),
            r#"[{"transport":"file","path":"x.log","level":"warn"}]"#
        );
    }

    #[test]
    fn normalizes_shorthand_and_missing_transport() {
        let configs = spec(json!(["file", {"level": "info"}])).normalize().unwrap();
        assert_eq!(configs[0].transport, "file");
        assert_eq!(configs[0].index, 0);
        assert_eq!(configs[1].transport, DEFAULT_TRANSPORT);
        assert_eq!(configs[1].option_str("level"), Some("info"));
        assert_eq!(configs[1].index, 1);
    }

    #[test]
    fn parses_worker_affinity() {
        let configs = spec(json!([
            {"transport": "console", "worker": 2},
            {"transport": "console", "worker": "3"},
            "console"
        ]))
        .normalize()
        .unwrap();
        assert_eq!(configs[0].worker, Some(WorkerId::new(2)));
        assert_eq!(configs[1].worker, Some(WorkerId::new(3)));
        assert_eq!(configs[2].worker, None);
    }

    #[test]
    fn rejects_invalid_worker_and_transport() {
        let err = spec(json!([{"worker": 0}])).normalize().unwrap_err();
        assert!(matches!(err, SpecError::InvalidWorker { index: 0, .. }));

        let err = spec(json!(["console", {"transport": 5}])).normalize().unwrap_err();
        assert!(matches!(err, SpecError::InvalidTransport { index: 1, .. }));
    }

    #[test]
    fn collects_from_names() {
        let s: LoggerSpec = ["console", "console"].into_iter().collect();
        assert_eq!(s.canonical_json(), r#"["console","console"]"#);
    }
}
