//! Demultiplexing of worker messages onto coordinator loggers.

use std::sync::Arc;

use crate::logger::{Level, Origin};
use crate::observability::metrics;
use crate::serialize::Value;
use crate::wire::{FramedCodec, WireCodec, WireMessage};
use crate::worker::WorkerId;

use super::Registry;

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Handed to `leaves` leaf loggers (zero when affinity excluded them all).
    Delivered { leaves: usize },
    /// No logger registered under the decoded identity.
    UnknownIdentity,
    /// The method is not in the severity vocabulary.
    UnknownMethod,
}

/// Routes raw worker payloads to the registered loggers.
#[derive(Debug, Clone)]
pub struct CoordinatorRouter {
    registry: Registry,
    codec: Arc<dyn WireCodec>,
}

impl CoordinatorRouter {
    pub fn new(registry: Registry, codec: Arc<dyn WireCodec>) -> Self {
        Self { registry, codec }
    }

    /// Router using the default framed codec.
    pub fn framed(registry: Registry) -> Self {
        Self::new(registry, Arc::new(FramedCodec))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Decode and dispatch one payload received from `worker`. Never fails.
    pub fn route(&self, worker: WorkerId, raw: &str) -> RouteOutcome {
        self.route_message(worker, self.codec.decode(raw))
    }

    pub fn route_message(&self, worker: WorkerId, message: WireMessage) -> RouteOutcome {
        let Some(logger) = self.registry.get(&message.identity) else {
            tracing::debug!(
                worker = %worker,
                identity = %message.identity,
                "Discarding message for unregistered logger"
            );
            metrics::record_message_dropped("unknown_identity");
            return RouteOutcome::UnknownIdentity;
        };

        let level = match message.method.parse::<Level>() {
            Ok(level) => level,
            Err(_) => {
                tracing::warn!(
                    worker = %worker,
                    identity = %message.identity,
                    method = %message.method,
                    "Discarding message with unknown method"
                );
                metrics::record_message_dropped("unknown_method");
                return RouteOutcome::UnknownMethod;
            }
        };

        let args: Vec<Value> = message.args.into_iter().map(Value::from).collect();
        let leaves = logger.dispatch(Origin::Worker(worker), level, &args);
        metrics::record_message_routed(level);
        RouteOutcome::Delivered { leaves }
    }
}
