use std::sync::atomic::AtomicU8;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use uuid::Uuid;

use crate::config::ContainerConfig;
use crate::container::container::{Container, ContainerInner, ACTIVE};
use crate::container::diagnostics::{DiagnosticsSink, NoopSink, TracingSink};
use crate::errors::CoreError;

/// Builder for constructing containers
///
/// Settings that are not given explicitly are inherited from the parent
/// (diagnostics sink, scope warnings) or fall back to the defaults of
/// [`ContainerConfig`].
#[derive(Default)]
pub struct ContainerBuilder {
    parent: Option<Container>,
    label: Option<String>,
    diagnostics: Option<Arc<dyn DiagnosticsSink>>,
    scope_warnings: Option<bool>,
    trace_diagnostics: bool,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Link the container to a parent scope
    pub fn parent(mut self, parent: &Container) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Set a label used in errors and logs
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the sink receiving advisories
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Enable or disable scope-safety advisories
    pub fn scope_warnings(mut self, enabled: bool) -> Self {
        self.scope_warnings = Some(enabled);
        self
    }

    /// Apply a validated configuration
    pub fn config(mut self, config: ContainerConfig) -> Result<Self, CoreError> {
        config.validate()?;
        if let Some(label) = config.label {
            self.label = Some(label);
        }
        self.scope_warnings = Some(config.scope_warnings);
        self.trace_diagnostics = config.trace_diagnostics;
        Ok(self)
    }

    /// Build the container
    pub fn build(self) -> Container {
        let parent_inner = self.parent.as_ref().map(|parent| &parent.inner);

        let diagnostics: Arc<dyn DiagnosticsSink> = match (self.diagnostics, parent_inner) {
            (Some(sink), _) => sink,
            (None, _) if self.trace_diagnostics => Arc::new(TracingSink),
            (None, Some(parent)) => parent.diagnostics.clone(),
            (None, None) => Arc::new(NoopSink),
        };
        let scope_warnings = self
            .scope_warnings
            .or_else(|| parent_inner.map(|parent| parent.scope_warnings))
            .unwrap_or(true);
        let depth = parent_inner.map_or(0, |parent| parent.depth + 1);

        Container::from_inner(ContainerInner {
            scope_id: Uuid::new_v4(),
            label: self.label,
            parent: self.parent,
            depth,
            diagnostics,
            scope_warnings,
            table: RwLock::new(IndexMap::new()),
            state: AtomicU8::new(ACTIVE),
        })
    }
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("parent", &self.parent.as_ref().map(Container::scope_id))
            .field("label", &self.label)
            .field("custom_diagnostics", &self.diagnostics.is_some())
            .field("scope_warnings", &self.scope_warnings)
            .field("trace_diagnostics", &self.trace_diagnostics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::diagnostics::MemorySink;

    #[test]
    fn test_child_inherits_diagnostics_and_warning_setting() {
        let sink = Arc::new(MemorySink::new());
        let root = ContainerBuilder::new()
            .diagnostics(sink.clone())
            .scope_warnings(false)
            .build();
        let child = ContainerBuilder::new().parent(&root).build();

        assert!(!child.inner.scope_warnings);
        assert!(Arc::ptr_eq(&child.inner.diagnostics, &root.inner.diagnostics));
    }

    #[test]
    fn test_config_applies_label_and_flags() {
        let config =
            ContainerConfig::from_yaml_str("label: request\nscope_warnings: false\n").unwrap();
        let container = ContainerBuilder::new().config(config).unwrap().build();

        assert_eq!(container.label(), Some("request"));
        assert!(!container.inner.scope_warnings);
        assert_eq!(container.depth(), 0);
    }

    #[test]
    fn test_config_rejects_invalid_label() {
        let config = ContainerConfig {
            label: Some(String::new()),
            ..ContainerConfig::default()
        };
        assert!(ContainerBuilder::new().config(config).is_err());
    }

    #[test]
    fn test_each_container_gets_unique_scope_id() {
        let a = ContainerBuilder::new().build();
        let b = ContainerBuilder::new().build();
        assert_ne!(a.scope_id(), b.scope_id());
    }
}
