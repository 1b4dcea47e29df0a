//! Aggregate loggers: one logical logger over several transports.

use std::sync::Arc;

use thiserror::Error;

use super::leaf::LeafLogger;
use super::{Level, Logger, Origin};
use crate::coordinator::Registry;
use crate::identity::{derive_identity, Identity};
use crate::observability::metrics;
use crate::serialize::{SafeSerializer, Value};
use crate::spec::{LoggerSpec, SpecError};
use crate::transport::{TransportError, TransportFactory};
use crate::wire::{FramedCodec, WireCodec, WireMessage};
use crate::worker::WorkerChannel;

/// Errors raised while building a coordinator logger.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Process role, chosen explicitly by whoever wires the process up.
#[derive(Clone)]
pub enum Role {
    Coordinator {
        registry: Registry,
        transports: Arc<dyn TransportFactory>,
        serializer: SafeSerializer,
    },
    Worker {
        channel: WorkerChannel,
        codec: Arc<dyn WireCodec>,
    },
}

impl Role {
    pub fn coordinator(registry: Registry, transports: Arc<dyn TransportFactory>) -> Self {
        Role::Coordinator {
            registry,
            transports,
            serializer: SafeSerializer::default(),
        }
    }

    /// Default formatting for coordinator leaves without an `indent` option.
    pub fn with_serializer(self, serializer: SafeSerializer) -> Self {
        match self {
            Role::Coordinator {
                registry,
                transports,
                ..
            } => Role::Coordinator {
                registry,
                transports,
                serializer,
            },
            worker => worker,
        }
    }

    /// Worker role using the default framed codec.
    pub fn worker(channel: WorkerChannel) -> Self {
        Role::Worker {
            channel,
            codec: Arc::new(FramedCodec),
        }
    }

    /// Replace the codec of a worker role; no effect on a coordinator role.
    pub fn with_codec(self, codec: Arc<dyn WireCodec>) -> Self {
        match self {
            Role::Worker { channel, .. } => Role::Worker { channel, codec },
            coordinator => coordinator,
        }
    }
}

/// Coordinator variant: owns the leaves and fans calls out to them.
#[derive(Debug)]
pub struct CoordinatorLogger {
    identity: Identity,
    leaves: Vec<LeafLogger>,
}

impl CoordinatorLogger {
    /// Build every leaf in spec order. Does not register.
    pub fn build(
        spec: &LoggerSpec,
        transports: &dyn TransportFactory,
        serializer: &SafeSerializer,
    ) -> Result<Self, BuildError> {
        let identity = derive_identity(spec);
        let leaves = spec
            .normalize()?
            .iter()
            .map(|config| Ok(LeafLogger::new(config, transports.create(config)?, serializer)))
            .collect::<Result<Vec<_>, TransportError>>()?;
        Ok(Self { identity, leaves })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn leaves(&self) -> &[LeafLogger] {
        &self.leaves
    }

    /// Call `level` on every leaf accepting `origin`, in spec order.
    /// Returns how many leaves were invoked.
    pub fn dispatch(&self, origin: Origin, level: Level, args: &[Value]) -> usize {
        let mut invoked = 0;
        for leaf in self.leaves.iter().filter(|leaf| leaf.accepts(origin)) {
            leaf.write(level, args);
            invoked += 1;
        }
        invoked
    }
}

impl Logger for CoordinatorLogger {
    fn write(&self, level: Level, args: &[Value]) {
        self.dispatch(Origin::Local, level, args);
    }
}

/// Worker variant: forwards every call to the coordinator.
#[derive(Debug, Clone)]
pub struct WorkerLogger {
    identity: Identity,
    channel: WorkerChannel,
    codec: Arc<dyn WireCodec>,
    serializer: SafeSerializer,
}

impl WorkerLogger {
    pub fn new(spec: &LoggerSpec, channel: WorkerChannel, codec: Arc<dyn WireCodec>) -> Self {
        Self {
            identity: derive_identity(spec),
            channel,
            codec,
            serializer: SafeSerializer::default(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl Logger for WorkerLogger {
    fn write(&self, level: Level, args: &[Value]) {
        let args = match self.serializer.to_json_args(args) {
            serde_json::Value::Array(items) => items,
            other => vec![other],
        };
        let message = WireMessage::new(self.identity.clone(), level.as_str(), args);
        if !self.channel.send(self.codec.encode(&message)) {
            metrics::record_message_dropped("channel_closed");
        }
    }
}

/// A logger group, in whichever role the process plays.
#[derive(Debug, Clone)]
pub enum AggregateLogger {
    Coordinator(Arc<CoordinatorLogger>),
    Worker(WorkerLogger),
}

impl AggregateLogger {
    /// Build a logger for `spec`.
    ///
    /// In the coordinator role the leaves are created and the logger is
    /// registered under its identity, replacing any earlier registration.
    /// The worker role cannot fail.
    pub fn new(spec: &LoggerSpec, role: &Role) -> Result<Self, BuildError> {
        match role {
            Role::Coordinator {
                registry,
                transports,
                serializer,
            } => {
                let logger = Arc::new(CoordinatorLogger::build(spec, transports.as_ref(), serializer)?);
                registry.register(Arc::clone(&logger));
                Ok(AggregateLogger::Coordinator(logger))
            }
            Role::Worker { channel, codec } => Ok(AggregateLogger::Worker(WorkerLogger::new(
                spec,
                channel.clone(),
                Arc::clone(codec),
            ))),
        }
    }

    pub fn identity(&self) -> &Identity {
        match self {
            AggregateLogger::Coordinator(logger) => logger.identity(),
            AggregateLogger::Worker(logger) => logger.identity(),
        }
    }

    pub fn as_coordinator(&self) -> Option<&Arc<CoordinatorLogger>> {
        match self {
            AggregateLogger::Coordinator(logger) => Some(logger),
            AggregateLogger::Worker(_) => None,
        }
    }
}

impl Logger for AggregateLogger {
    fn write(&self, level: Level, args: &[Value]) {
        match self {
            AggregateLogger::Coordinator(logger) => logger.write(level, args),
            AggregateLogger::Worker(logger) => logger.write(level, args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IDENTITY_LEN;
    use crate::transport::{MemoryEntry, StandardTransports};
    use serde_json::json;

    fn spec(value: serde_json::Value) -> LoggerSpec {
        serde_json::from_value(value).unwrap()
    }

    fn coordinator_role() -> (Role, Registry, Arc<StandardTransports>) {
        let registry = Registry::new();
        let transports = Arc::new(StandardTransports::new());
        let role = Role::coordinator(registry.clone(), transports.clone());
        (role, registry, transports)
    }

    #[test]
    fn coordinator_fans_out_in_spec_order() {
        let (role, registry, transports) = coordinator_role();
        let logger = AggregateLogger::new(&spec(json!(["memory", "memory"])), &role).unwrap();

        logger.warn(&crate::args!["x"]);

        let sinks = transports.memory_sinks();
        assert_eq!(sinks.len(), 2);
        let expected = vec![MemoryEntry {
            level: Level::Warn,
            message: "x".into(),
        }];
        assert_eq!(sinks[0].entries(), expected);
        assert_eq!(sinks[1].entries(), expected);
        assert!(registry.get(logger.identity()).is_some());
    }

    #[test]
    fn coordinator_leaves_follow_spec_positions() {
        let (role, _, _) = coordinator_role();
        let logger = AggregateLogger::new(
            &spec(json!(["console", {"transport": "memory", "worker": 2}])),
            &role,
        )
        .unwrap();
        let leaves = logger.as_coordinator().unwrap().leaves();
        assert_eq!(leaves[0].index(), 0);
        assert_eq!(leaves[0].transport(), "console");
        assert_eq!(leaves[1].index(), 1);
        assert_eq!(leaves[1].worker().map(|w| w.as_u32()), Some(2));
    }

    #[test]
    fn local_calls_ignore_affinity() {
        let (role, _, transports) = coordinator_role();
        let logger = AggregateLogger::new(
            &spec(json!([{"transport": "memory", "worker": 1}, "memory"])),
            &role,
        )
        .unwrap();
        logger.log(&crate::args!["local"]);
        assert!(transports.memory_sinks().iter().all(|sink| sink.len() == 1));
    }

    #[test]
    fn log_entry_point_is_the_log_level() {
        let (role, _, transports) = coordinator_role();
        let logger = AggregateLogger::new(&spec(json!(["memory"])), &role).unwrap();
        logger.log(&crate::args!["a"]);
        logger.write(Level::Log, &crate::args!["b"]);
        let entries = transports.memory_sinks()[0].entries();
        assert!(entries.iter().all(|e| e.level == Level::Log));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn coordinator_build_fails_on_unknown_transport() {
        let (role, registry, _) = coordinator_role();
        let err = AggregateLogger::new(&spec(json!(["smoke-signal"])), &role).unwrap_err();
        assert!(matches!(err, BuildError::Transport(TransportError::Unknown { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn worker_encodes_and_sends() {
        let (channel, mut rx) = WorkerChannel::new();
        let s = spec(json!(["console"]));
        let logger = AggregateLogger::new(&s, &Role::worker(channel)).unwrap();

        logger.info(&crate::args!["hi"]);

        let id = derive_identity(&s);
        assert_eq!(id.as_str().len(), IDENTITY_LEN);
        assert_eq!(rx.try_recv().unwrap(), format!("{}info[\"hi\"]", id));
    }

    #[test]
    fn worker_and_coordinator_share_identity() {
        let (role, _, _) = coordinator_role();
        let s = spec(json!(["memory", {"transport": "memory", "level": "warn"}]));
        let coordinator = AggregateLogger::new(&s, &role).unwrap();
        let worker = AggregateLogger::new(&s, &Role::worker(WorkerChannel::disconnected())).unwrap();
        assert_eq!(coordinator.identity(), worker.identity());
    }

    #[test]
    fn worker_with_closed_channel_is_silent() {
        let logger = AggregateLogger::new(
            &spec(json!(["console"])),
            &Role::worker(WorkerChannel::disconnected()),
        )
        .unwrap();
        logger.error(&crate::args!["nobody listens"]);
    }

    #[test]
    fn worker_serializes_cycles() {
        let (channel, mut rx) = WorkerChannel::new();
        let logger = AggregateLogger::new(&spec(json!(["console"])), &Role::worker(channel)).unwrap();
        let a = Value::object();
        a.insert("a", a.clone());

        logger.debug(&[a]);

        let raw = rx.try_recv().unwrap();
        assert!(raw.ends_with(r#"debug[{"a":"[Circular]"}]"#));
    }

    #[test]
    fn worker_role_honors_codec_override() {
        let (channel, mut rx) = WorkerChannel::new();
        let role = Role::worker(channel).with_codec(Arc::new(crate::wire::RecordCodec));
        let logger = AggregateLogger::new(&spec(json!(["console"])), &role).unwrap();
        logger.trace(&crate::args![1]);
        assert!(rx.try_recv().unwrap().starts_with("{\"id\":\"CEDAR_"));
    }
}
