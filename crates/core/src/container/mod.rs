#[allow(clippy::module_inception)]
pub mod container;
pub mod builder;
pub mod diagnostics;
pub mod keys;
pub mod kind;
pub mod lifecycle;
pub mod registration;
pub mod summary;

pub use container::Container;
pub use builder::ContainerBuilder;
pub use diagnostics::{Advisory, DiagnosticsSink, MemorySink, NoopSink, TracingSink};
pub use keys::{Keyed, ServiceKey};
pub use kind::ServiceKind;
pub use lifecycle::Disposable;
pub use registration::{RegistrationHandle, ServiceAny};
pub use summary::{ScopeSummary, ServiceSummary};
