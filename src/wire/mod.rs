//! Wire encoding of forwarded log calls.
//!
//! # Data Flow
//! ```text
//! Worker:      (identity, method, args) → WireCodec::encode → String → channel
//! Coordinator: channel → String → WireCodec::decode → WireMessage → router
//! ```
//!
//! # Design Decisions
//! - The codec is a trait so loggers and the router never see the framing
//! - `FramedCodec` is the default fixed-width format:
//!   `<identity: 14 chars><method>[<JSON args>]`
//! - `RecordCodec` is a tagged JSON record alternative
//! - Decoding never fails; malformed payloads degrade to a best-effort message

pub mod framed;
pub mod record;

pub use framed::FramedCodec;
pub use record::RecordCodec;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::identity::Identity;

/// One forwarded log call.
#[derive(Debug, Clone, PartialEq)]
pub struct WireMessage {
    pub identity: Identity,
    pub method: String,
    pub args: Vec<JsonValue>,
}

impl WireMessage {
    pub fn new(identity: Identity, method: impl Into<String>, args: Vec<JsonValue>) -> Self {
        Self {
            identity,
            method: method.into(),
            args,
        }
    }
}

/// Encodes and decodes wire messages.
pub trait WireCodec: Send + Sync + std::fmt::Debug {
    fn encode(&self, message: &WireMessage) -> String;

    /// Best-effort decode; never fails.
    fn decode(&self, raw: &str) -> WireMessage;
}

/// Codec selection, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    #[default]
    Framed,
    Record,
}

impl CodecKind {
    pub fn build(self) -> Arc<dyn WireCodec> {
        match self {
            CodecKind::Framed => Arc::new(FramedCodec),
            CodecKind::Record => Arc::new(RecordCodec),
        }
    }
}
