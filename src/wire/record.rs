//! Tagged JSON record encoding: `{"id":..,"method":..,"args":[..]}`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{WireCodec, WireMessage};
use crate::identity::Identity;

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordCodec;

#[derive(Serialize)]
struct RecordRef<'a> {
    id: &'a str,
    method: &'a str,
    args: &'a [JsonValue],
}

#[derive(Deserialize)]
struct Record {
    id: String,
    method: String,
    #[serde(default)]
    args: Vec<JsonValue>,
}

impl WireCodec for RecordCodec {
    fn encode(&self, message: &WireMessage) -> String {
        let record = RecordRef {
            id: message.identity.as_str(),
            method: &message.method,
            args: &message.args,
        };
        serde_json::to_string(&record).unwrap_or_default()
    }

    fn decode(&self, raw: &str) -> WireMessage {
        match serde_json::from_str::<Record>(raw) {
            Ok(record) => WireMessage::new(Identity::from_wire(&record.id), record.method, record.args),
            Err(e) => {
                tracing::debug!(error = %e, "Malformed record payload");
                WireMessage::new(Identity::from_wire(""), "", vec![JsonValue::String(raw.to_string())])
            }
        }
    }
}
