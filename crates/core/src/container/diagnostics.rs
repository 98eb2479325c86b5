//! Advisory diagnostics
//!
//! Containers report scope-safety hints to a [`DiagnosticsSink`] instead of a
//! process-wide log stream. Advisories never change a resolution outcome.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use uuid::Uuid;

/// Advisory emitted by a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "advisory", rename_all = "snake_case")]
pub enum Advisory {
    /// A singleton declared dependencies that may live in a narrower scope
    SingletonDeclaresDependencies {
        service: String,
        dependencies: Vec<String>,
    },
    /// An ancestor-owned singleton was first produced from a descendant scope
    ScopeUnsafeSingleton {
        service: String,
        owner_scope: Uuid,
        requesting_scope: Uuid,
    },
}

impl Advisory {
    /// Name of the service the advisory is about
    pub fn service(&self) -> &str {
        match self {
            Advisory::SingletonDeclaresDependencies { service, .. }
            | Advisory::ScopeUnsafeSingleton { service, .. } => service,
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::SingletonDeclaresDependencies {
                service,
                dependencies,
            } => write!(
                f,
                "singleton '{}' declares dependencies [{}]; if any of them is registered in a child scope the shared instance will capture it",
                service,
                dependencies.join(", ")
            ),
            Advisory::ScopeUnsafeSingleton {
                service,
                owner_scope,
                requesting_scope,
            } => write!(
                f,
                "singleton '{}' owned by scope {} was first produced from descendant scope {}; the cached value is now shared by every scope",
                service, owner_scope, requesting_scope
            ),
        }
    }
}

/// Receiver for container advisories
pub trait DiagnosticsSink: Send + Sync {
    /// Report an advisory
    fn warn(&self, advisory: &Advisory);
}

/// Sink that drops every advisory
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticsSink for NoopSink {
    fn warn(&self, _advisory: &Advisory) {}
}

/// Sink forwarding advisories to `tracing` at warn level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn warn(&self, advisory: &Advisory) {
        tracing::warn!(service = %advisory.service(), "{}", advisory);
    }
}

/// Sink that keeps every advisory in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    advisories: Mutex<Vec<Advisory>>,
}

impl MemorySink {
    /// Create an empty memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded advisories, oldest first
    pub fn advisories(&self) -> Vec<Advisory> {
        self.advisories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded advisories
    pub fn len(&self) -> usize {
        self.advisories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every recorded advisory
    pub fn clear(&self) {
        self.advisories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DiagnosticsSink for MemorySink {
    fn warn(&self, advisory: &Advisory) {
        self.advisories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(advisory.clone());
    }
}
