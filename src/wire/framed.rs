//! Fixed-width framing: `<identity><method><JSON array of args>`.
//!
//! The identity is always `IDENTITY_LEN` ASCII characters without `[`, so the
//! method ends at the first `[` after it and no escaping is needed.

use serde_json::Value as JsonValue;

use super::{WireCodec, WireMessage};
use crate::identity::{Identity, IDENTITY_LEN};

#[derive(Debug, Clone, Copy, Default)]
pub struct FramedCodec;

impl WireCodec for FramedCodec {
    fn encode(&self, message: &WireMessage) -> String {
        // A Vec of JSON values always serializes.
        let args = serde_json::to_string(&message.args).unwrap_or_else(|_| "[]".to_string());
        let mut raw = String::with_capacity(IDENTITY_LEN + message.method.len() + args.len());
        raw.push_str(message.identity.as_str());
        raw.push_str(&message.method);
        raw.push_str(&args);
        raw
    }

    fn decode(&self, raw: &str) -> WireMessage {
        let Some((identity, rest)) = split_identity(raw) else {
            return WireMessage::new(Identity::from_wire(raw), "", Vec::new());
        };

        let Some(pos) = rest.find('[') else {
            return WireMessage::new(Identity::from_wire(identity), rest, Vec::new());
        };

        let (method, data) = rest.split_at(pos);
        let args = match serde_json::from_str::<JsonValue>(data) {
            Ok(JsonValue::Array(args)) => args,
            _ => vec![JsonValue::String(data.to_string())],
        };

        WireMessage::new(Identity::from_wire(identity), method, args)
    }
}

fn split_identity(raw: &str) -> Option<(&str, &str)> {
    if raw.len() < IDENTITY_LEN || !raw.is_char_boundary(IDENTITY_LEN) {
        return None;
    }
    Some(raw.split_at(IDENTITY_LEN))
}
