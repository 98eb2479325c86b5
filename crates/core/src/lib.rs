//! Scoped dependency injection container
//!
//! Services are registered under string names as pre-built instances,
//! factories or lazily cached singletons, and resolved through a chain of
//! parent scopes. See [`Container`] for the full surface.

pub mod config;
pub mod container;
pub mod errors;

// Re-export key types for convenience
pub use config::ContainerConfig;
pub use container::{
    Advisory, Container, ContainerBuilder, DiagnosticsSink, Disposable, Keyed, MemorySink,
    NoopSink, RegistrationHandle, ScopeSummary, ServiceAny, ServiceKey, ServiceKind,
    ServiceSummary, TracingSink,
};
pub use errors::CoreError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
