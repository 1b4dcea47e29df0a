//! Startup orchestration for both process roles.
//!
//! # Responsibilities
//! - Build one aggregate logger per configured group, in the given role
//! - Spawn worker processes and route their output (coordinator)
//! - Emit the configured workload and drain the channel (worker)
//!
//! # Design Decisions
//! - Fail fast: a group that cannot be built aborts startup
//! - Worker processes are the same executable with the `worker` subcommand
//! - Workers are killed when the coordinator drops them

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::process::{Child, Command};

use super::Shutdown;
use crate::args;
use crate::config::CedarConfig;
use crate::coordinator::{Coordinator, CoordinatorRouter, Registry};
use crate::logger::{AggregateLogger, BuildError, Level, Logger, Role};
use crate::serialize::{SafeSerializer, Value};
use crate::transport::{StandardTransports, TransportFactory};
use crate::worker::{WorkerChannel, WorkerId};

/// How long reader tasks get to wind down after ctrl-c.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("logger group `{group}`: {source}")]
    Build { group: String, source: BuildError },

    #[error("failed to locate the cedar executable: {0}")]
    Executable(#[source] io::Error),

    #[error("failed to spawn {worker}: {source}")]
    Spawn { worker: WorkerId, source: io::Error },

    #[error("{0} was spawned without a stdout pipe")]
    MissingStdout(WorkerId),
}

/// A named aggregate logger.
#[derive(Debug, Clone)]
pub struct LoggerGroup {
    pub name: String,
    pub logger: AggregateLogger,
}

/// Build every configured group in `role`, in config order.
pub fn build_loggers(config: &CedarConfig, role: &Role) -> Result<Vec<LoggerGroup>, StartupError> {
    config
        .loggers
        .iter()
        .map(|group| {
            let logger = AggregateLogger::new(&group.transports, role).map_err(|source| {
                StartupError::Build {
                    group: group.name.clone(),
                    source,
                }
            })?;
            tracing::debug!(group = %group.name, identity = %logger.identity(), "Logger group built");
            Ok(LoggerGroup {
                name: group.name.clone(),
                logger,
            })
        })
        .collect()
}

/// Coordinator role using the configured serializer indent.
pub fn coordinator_role(
    config: &CedarConfig,
    registry: Registry,
    transports: Arc<dyn TransportFactory>,
) -> Role {
    Role::coordinator(registry, transports)
        .with_serializer(SafeSerializer::new(config.serializer.indent.clone()))
}

/// Start `exe worker --config <config_path> --id <worker>` with its stdout
/// piped back to the caller.
pub fn spawn_worker(exe: &Path, config_path: &Path, worker: WorkerId) -> Result<Child, StartupError> {
    Command::new(exe)
        .arg("worker")
        .arg("--config")
        .arg(config_path)
        .arg("--id")
        .arg(worker.as_u32().to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| StartupError::Spawn { worker, source })
}

/// Run the coordinator until every worker has finished or `shutdown` fires.
pub async fn run_coordinator(
    config: &CedarConfig,
    config_path: &Path,
    shutdown: Shutdown,
) -> Result<(), StartupError> {
    let registry = Registry::new();
    let role = coordinator_role(config, registry.clone(), Arc::new(StandardTransports::new()));
    let groups = build_loggers(config, &role)?;

    for identity in registry.identities() {
        tracing::debug!(identity = %identity, "Accepting worker messages");
    }
    tracing::info!(
        loggers = registry.len(),
        workers = config.workers.count,
        codec = ?config.wire.codec,
        "Coordinator starting"
    );
    broadcast(&groups, Level::Info, "coordinator started", config.workers.count);

    let coordinator = Coordinator::new(CoordinatorRouter::new(registry, config.wire.codec.build()));
    let exe = std::env::current_exe().map_err(StartupError::Executable)?;

    let mut stop = shutdown.subscribe();
    let mut children = Vec::new();
    let mut readers = Vec::new();
    for id in 1..=config.workers.count {
        let worker = WorkerId::new(id);
        let mut child = spawn_worker(&exe, config_path, worker)?;
        let stdout = child.stdout.take().ok_or(StartupError::MissingStdout(worker))?;
        readers.push(coordinator.attach(worker, stdout, shutdown.subscribe()));
        tracing::info!(worker = %worker, pid = ?child.id(), "Worker spawned");
        children.push((worker, child));
    }

    if !shutdown.is_triggered() {
        tokio::select! {
            _ = async {
                for reader in readers.iter_mut() {
                    let _ = reader.await;
                }
            } => {}
            _ = stop.recv() => {}
        }
    }

    if shutdown.is_triggered() {
        for (worker, child) in children.iter_mut() {
            if let Err(e) = child.start_kill() {
                tracing::debug!(worker = %worker, error = %e, "Worker already gone");
            }
        }
        let tracker = coordinator.tracker();
        if tokio::time::timeout(DRAIN_TIMEOUT, tracker.wait_until_idle()).await.is_err() {
            tracing::warn!(online = tracker.online_count(), "Reader tasks still running after drain timeout");
        }
    }

    for (worker, mut child) in children {
        match child.wait().await {
            Ok(status) if status.success() => tracing::debug!(worker = %worker, "Worker exited"),
            Ok(status) => tracing::warn!(worker = %worker, status = %status, "Worker exited abnormally"),
            Err(e) => tracing::warn!(worker = %worker, error = %e, "Failed to reap worker"),
        }
    }

    broadcast(&groups, Level::Info, "coordinator finished", config.workers.count);
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Run a worker: emit the configured workload, then drain the channel.
pub async fn run_worker(config: &CedarConfig, worker: WorkerId) -> Result<(), StartupError> {
    let (channel, writer) = WorkerChannel::stdout();
    let role = Role::worker(channel).with_codec(config.wire.codec.build());
    let groups = build_loggers(config, &role)?;
    drop(role);

    emit_workload(&groups, worker, config.workers.messages);

    // The writer task ends once the last channel clone is gone.
    drop(groups);
    if let Err(e) = writer.await {
        tracing::warn!(worker = %worker, error = %e, "Worker channel writer failed");
    }
    tracing::debug!(worker = %worker, "Worker finished");
    Ok(())
}

fn broadcast(groups: &[LoggerGroup], level: Level, message: &str, workers: u32) {
    for group in groups {
        let details = Value::object();
        details.insert("group", group.name.as_str()).insert("workers", workers);
        group.logger.write(level, &args![message, details]);
    }
}

/// `messages` calls per group, cycling through the levels.
fn emit_workload(groups: &[LoggerGroup], worker: WorkerId, messages: u32) {
    for sequence in 1..=messages {
        let level = Level::ALL[(sequence as usize - 1) % Level::ALL.len()];
        for group in groups {
            let details = Value::object();
            details
                .insert("worker", worker.as_u32())
                .insert("group", group.name.as_str())
                .insert("sequence", sequence);
            group
                .logger
                .write(level, &args![format!("message {sequence} of {messages}"), details]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::wire::{FramedCodec, WireCodec};

    fn config() -> CedarConfig {
        parse_config(
            r#"
            [serializer]
            indent = "    "

            [[loggers]]
            name = "app"
            transports = ["memory"]

            [[loggers]]
            name = "audit"
            transports = ["memory", { transport = "memory", level = "warn" }]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn coordinator_groups_are_registered() {
        let config = config();
        let registry = Registry::new();
        let transports = Arc::new(StandardTransports::new());
        let role = coordinator_role(&config, registry.clone(), transports.clone());

        let groups = build_loggers(&config, &role).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "app");
        assert_eq!(registry.len(), 2);
        assert_eq!(transports.memory_sinks().len(), 3);
    }

    #[test]
    fn broadcast_uses_configured_indent() {
        let config = config();
        let transports = Arc::new(StandardTransports::new());
        let role = coordinator_role(&config, Registry::new(), transports.clone());
        let groups = build_loggers(&config, &role).unwrap();

        broadcast(&groups, Level::Info, "up", 2);

        let sinks = transports.memory_sinks();
        let entry = &sinks[0].entries()[0];
        assert_eq!(entry.level, Level::Info);
        assert!(entry.message.starts_with("up\n    {"));
        // level = "warn" filters the info call
        assert!(sinks[2].is_empty());
    }

    #[test]
    fn build_failure_names_the_group() {
        let mut config = config();
        config.loggers[1].transports = ["pigeon"].into_iter().collect();
        let role = coordinator_role(&config, Registry::new(), Arc::new(StandardTransports::new()));

        let err = build_loggers(&config, &role).unwrap_err();
        assert!(matches!(err, StartupError::Build { ref group, .. } if group == "audit"));
    }

    #[test]
    fn workload_is_framed_per_group() {
        let config = config();
        let (channel, mut rx) = WorkerChannel::new();
        let groups = build_loggers(&config, &Role::worker(channel)).unwrap();

        emit_workload(&groups, WorkerId::new(4), 2);

        let mut payloads = Vec::new();
        while let Ok(payload) = rx.try_recv() {
            payloads.push(FramedCodec.decode(&payload));
        }
        assert_eq!(payloads.len(), 4);
        assert_eq!(payloads[0].method, "error");
        assert_eq!(payloads[2].method, "warn");
        assert_eq!(&payloads[0].identity, groups[0].logger.identity());
        assert_eq!(&payloads[1].identity, groups[1].logger.identity());
        assert_eq!(payloads[3].args[0], "message 2 of 2");
        assert_eq!(payloads[3].args[1]["worker"], 4);
    }
}
