//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every transport can be built by the standard factory
//! - Check worker affinities point at workers that will exist
//! - Detect logger groups that would share an identity
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CedarConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::config::schema::CedarConfig;
use crate::identity::derive_identity;
use crate::spec::SpecError;
use crate::transport::KNOWN_TRANSPORTS;

/// One semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("logger group `{0}` has no transports")]
    EmptyGroup(String),

    #[error("logger group name `{0}` is used more than once")]
    DuplicateGroup(String),

    #[error("logger groups `{first}` and `{second}` have the same transports and would share identity {identity}")]
    DuplicateIdentity {
        first: String,
        second: String,
        identity: String,
    },

    #[error("logger group `{group}`: {error}")]
    InvalidDescriptor { group: String, error: SpecError },

    #[error("logger group `{group}`: transport #{index} `{name}` is not a known transport")]
    UnknownTransport {
        group: String,
        index: usize,
        name: String,
    },

    #[error("logger group `{group}`: file transport #{index} needs a `path`")]
    MissingPath { group: String, index: usize },

    #[error("logger group `{group}`: transport #{index} is bound to worker {worker}, but only {count} workers are spawned")]
    WorkerOutOfRange {
        group: String,
        index: usize,
        worker: u32,
        count: u32,
    },

    #[error("serializer indent must only contain whitespace, got {0:?}")]
    InvalidIndent(String),
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &CedarConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut names: HashSet<&str> = HashSet::new();
    let mut identities: HashMap<String, &str> = HashMap::new();

    if !config.serializer.indent.chars().all(char::is_whitespace) {
        errors.push(ValidationError::InvalidIndent(config.serializer.indent.clone()));
    }

    for group in &config.loggers {
        if !names.insert(group.name.as_str()) {
            errors.push(ValidationError::DuplicateGroup(group.name.clone()));
        }

        if group.transports.is_empty() {
            errors.push(ValidationError::EmptyGroup(group.name.clone()));
            continue;
        }

        let identity = derive_identity(&group.transports).to_string();
        if let Some(first) = identities.get(&identity) {
            errors.push(ValidationError::DuplicateIdentity {
                first: first.to_string(),
                second: group.name.clone(),
                identity: identity.clone(),
            });
        } else {
            identities.insert(identity, group.name.as_str());
        }

        let transports = match group.transports.normalize() {
            Ok(transports) => transports,
            Err(error) => {
                errors.push(ValidationError::InvalidDescriptor {
                    group: group.name.clone(),
                    error,
                });
                continue;
            }
        };

        for transport in transports {
            if !KNOWN_TRANSPORTS.contains(&transport.transport.as_str()) {
                errors.push(ValidationError::UnknownTransport {
                    group: group.name.clone(),
                    index: transport.index,
                    name: transport.transport.clone(),
                });
            }
            if transport.transport == "file" && transport.option_str("path").is_none() {
                errors.push(ValidationError::MissingPath {
                    group: group.name.clone(),
                    index: transport.index,
                });
            }
            if let Some(worker) = transport.worker {
                if worker.as_u32() > config.workers.count {
                    errors.push(ValidationError::WorkerOutOfRange {
                        group: group.name.clone(),
                        index: transport.index,
                        worker: worker.as_u32(),
                        count: config.workers.count,
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
