use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::{IndexMap, IndexSet};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::container::builder::ContainerBuilder;
use crate::container::diagnostics::{Advisory, DiagnosticsSink};
use crate::container::keys::{Keyed, ServiceKey};
use crate::container::lifecycle::Disposable;
use crate::container::registration::{
    async_producer, sync_producer, Registration, RegistrationHandle, RegistrationKind, ServiceAny,
};
use crate::container::summary::{ScopeSummary, ServiceSummary};
use crate::errors::CoreError;

type Table = IndexMap<String, Registration>;

pub(crate) const ACTIVE: u8 = 0;
const DISPOSING: u8 = 1;
const DISPOSED: u8 = 2;

/// Shared state behind a [`Container`] handle
pub(crate) struct ContainerInner {
    pub(crate) scope_id: Uuid,
    pub(crate) label: Option<String>,
    pub(crate) parent: Option<Container>,
    pub(crate) depth: usize,
    pub(crate) diagnostics: Arc<dyn DiagnosticsSink>,
    pub(crate) scope_warnings: bool,
    pub(crate) table: RwLock<Table>,
    pub(crate) state: AtomicU8,
}

/// Scoped dependency injection container
///
/// Cloning a container clones the handle; both clones see the same table.
///
/// ```rust
/// use scoped_di::Container;
///
/// struct Config { port: u16 }
/// struct Server { port: u16 }
///
/// let root = Container::new();
/// root.register_instance("config", Config { port: 3000 })?;
/// root.register_singleton("server", |c| {
///     let config = c.resolve::<Config>("config")?;
///     Ok(Server { port: config.port })
/// })?;
///
/// let request = root.create_child();
/// assert_eq!(request.resolve::<Server>("server")?.port, 3000);
/// # Ok::<(), scoped_di::CoreError>(())
/// ```
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

/// Registration found by a lookup, with the container that owns it
struct Located {
    registration: Registration,
    owner: Container,
}

impl Container {
    /// Create a new root container
    pub fn new() -> Self {
        ContainerBuilder::new().build()
    }

    /// Create a container whose lookups fall through to `parent`
    pub fn with_parent(parent: &Container) -> Self {
        ContainerBuilder::new().parent(parent).build()
    }

    /// Start building a container
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_inner(inner: ContainerInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Register a pre-built value
    pub fn register_instance<T>(
        &self,
        name: impl Into<String>,
        value: T,
    ) -> Result<RegistrationHandle<'_, T>, CoreError>
    where
        T: Send + Sync + 'static,
    {
        self.insert(name.into(), Registration::instance(Arc::new(value)))
    }

    /// Register a pre-built value that is disposed with this container
    pub fn register_disposable_instance<T>(
        &self,
        name: impl Into<String>,
        value: T,
    ) -> Result<RegistrationHandle<'_, T>, CoreError>
    where
        T: Disposable + 'static,
    {
        Ok(self.register_instance(name, value)?.disposable())
    }

    /// Register a producer invoked on every resolution
    pub fn register_factory<T, F>(
        &self,
        name: impl Into<String>,
        producer: F,
    ) -> Result<RegistrationHandle<'_, T>, CoreError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T, CoreError> + Send + Sync + 'static,
    {
        self.insert(name.into(), Registration::factory(sync_producer(producer)))
    }

    /// Register an asynchronous producer invoked on every resolution
    pub fn register_async_factory<T, F, Fut>(
        &self,
        name: impl Into<String>,
        producer: F,
    ) -> Result<RegistrationHandle<'_, T>, CoreError>
    where
        T: Send + Sync + 'static,
        F: Fn(Container) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        self.insert(name.into(), Registration::factory(async_producer(producer)))
    }

    /// Register a producer whose first successful value is cached
    pub fn register_singleton<T, F>(
        &self,
        name: impl Into<String>,
        producer: F,
    ) -> Result<RegistrationHandle<'_, T>, CoreError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T, CoreError> + Send + Sync + 'static,
    {
        self.insert(name.into(), Registration::singleton(sync_producer(producer)))
    }

    /// Register an asynchronous producer whose first successful value is cached
    pub fn register_async_singleton<T, F, Fut>(
        &self,
        name: impl Into<String>,
        producer: F,
    ) -> Result<RegistrationHandle<'_, T>, CoreError>
    where
        T: Send + Sync + 'static,
        F: Fn(Container) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        self.insert(name.into(), Registration::singleton(async_producer(producer)))
    }

    fn insert<T>(
        &self,
        name: String,
        registration: Registration,
    ) -> Result<RegistrationHandle<'_, T>, CoreError>
    where
        T: Send + Sync + 'static,
    {
        self.ensure_active()?;

        let kind = registration.service_kind();
        let previous = self.write_table().insert(name.clone(), registration);
        if previous.is_some() {
            tracing::debug!(service = %name, scope = %self.inner.scope_id, %kind, "Replaced existing registration");
        } else {
            tracing::trace!(service = %name, scope = %self.inner.scope_id, %kind, "Registered service");
        }

        Ok(RegistrationHandle::new(self, name))
    }

    /// Resolve a service and downcast it to `T`
    pub fn resolve<T>(&self, name: &str) -> Result<Arc<T>, CoreError>
    where
        T: Send + Sync + 'static,
    {
        downcast(name, self.resolve_any(name)?)
    }

    /// Try to resolve a service, returning None on any failure
    pub fn try_resolve<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.resolve::<T>(name).ok()
    }

    /// Resolve a service asynchronously and downcast it to `T`
    pub async fn resolve_async<T>(&self, name: &str) -> Result<Arc<T>, CoreError>
    where
        T: Send + Sync + 'static,
    {
        downcast(name, self.resolve_any_async(name).await?)
    }

    /// Resolve a service without waiting on asynchronous producers
    pub fn resolve_any(&self, name: &str) -> Result<ServiceAny, CoreError> {
        self.ensure_not_disposed()?;
        let Located {
            registration,
            owner,
        } = self.lookup(name)?;

        match registration.kind {
            RegistrationKind::Instance(value) => Ok(value),
            RegistrationKind::Factory(producer) => producer(self).now(name),
            RegistrationKind::Singleton { producer, cached } => {
                if let Some(value) = cached.get() {
                    return Ok(value.clone());
                }

                owner.ensure_producing()?;
                let value = producer(self).now(name)?;
                self.warn_if_scope_unsafe(name, &owner);
                owner.cache_singleton(name, &cached, value)
            }
        }
    }

    /// Resolve a service, awaiting asynchronous producers
    pub async fn resolve_any_async(&self, name: &str) -> Result<ServiceAny, CoreError> {
        self.ensure_not_disposed()?;
        let Located {
            registration,
            owner,
        } = self.lookup(name)?;

        match registration.kind {
            RegistrationKind::Instance(value) => Ok(value),
            RegistrationKind::Factory(producer) => producer(self).settle().await,
            RegistrationKind::Singleton { producer, cached } => {
                let value = cached
                    .get_or_try_init(|| async {
                        owner.ensure_producing()?;
                        let value = producer(self).settle().await?;
                        self.warn_if_scope_unsafe(name, &owner);
                        tracing::debug!(service = %name, scope = %owner.inner.scope_id, "Cached singleton");
                        Ok::<_, CoreError>(value)
                    })
                    .await?;
                Ok(value.clone())
            }
        }
    }

    /// Check if `name` is registered here or in any ancestor
    pub fn has(&self, name: &str) -> bool {
        !self.is_disposed() && self.ancestry().any(|scope| scope.contains_local(name))
    }

    /// Check if `name` is registered in this container's own table
    pub fn contains_local(&self, name: &str) -> bool {
        self.read_table().contains_key(name)
    }

    /// Create a child scope
    pub fn create_child(&self) -> Container {
        let child = Container::with_parent(self);
        tracing::trace!(scope = %child.inner.scope_id, parent = %self.inner.scope_id, "Created child scope");
        child
    }

    /// Get the parent container, if any
    pub fn parent(&self) -> Option<Container> {
        self.inner.parent.clone()
    }

    /// Get the parent container, or this container for a root
    pub fn parent_or_current(&self) -> Container {
        self.parent().unwrap_or_else(|| self.clone())
    }

    /// Names visible from this container, nearest scope first
    pub fn list(&self) -> Vec<String> {
        if self.is_disposed() {
            return Vec::new();
        }

        let mut names = IndexSet::new();
        for scope in self.ancestry() {
            for name in scope.read_table().keys() {
                if !names.contains(name) {
                    names.insert(name.clone());
                }
            }
        }
        names.into_iter().collect()
    }

    /// Remove every local registration without disposing anything
    pub fn clear(&self) {
        let mut table = self.write_table();
        tracing::trace!(scope = %self.inner.scope_id, count = table.len(), "Clearing registrations");
        table.clear();
    }

    /// Dispose held values, clear the table and reject further registration
    ///
    /// Instances and cached singletons registered as disposable are disposed
    /// one at a time in registration order. A singleton production already in
    /// flight is awaited and its value disposed. A failing disposal does not
    /// stop the others; the first failure is returned once teardown completes.
    /// Calling this again is a no-op.
    ///
    /// While teardown runs the table stays readable: instances, factories and
    /// cached singletons still resolve, but registration and new singleton
    /// productions in this container fail with [`CoreError::Disposed`].
    pub async fn dispose(&self) -> Result<(), CoreError> {
        let entries: Vec<(String, Registration)> = {
            let table = self.write_table();
            if self
                .inner
                .state
                .compare_exchange(ACTIVE, DISPOSING, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return Ok(());
            }
            table
                .iter()
                .map(|(name, registration)| (name.clone(), registration.clone()))
                .collect()
        };

        let scope = self.display_name();
        let mut first_failure = None;
        for (name, registration) in entries {
            let Some((value, disposer)) = registration.disposal(&scope).await else {
                continue;
            };

            tracing::debug!(service = %name, scope = %self.inner.scope_id, "Disposing service");
            if let Err(error) = disposer(value).await {
                tracing::warn!(service = %name, scope = %self.inner.scope_id, %error, "Error disposing service");
                if first_failure.is_none() {
                    first_failure = Some(CoreError::DisposalFailed {
                        service: name,
                        source: Box::new(error),
                    });
                }
            }
        }

        self.write_table().clear();
        self.inner.state.store(DISPOSED, Ordering::Release);
        tracing::debug!(scope = %self.inner.scope_id, "Container disposed");

        match first_failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Check if disposal has completed
    pub fn is_disposed(&self) -> bool {
        self.state() == DISPOSED
    }

    /// Typed view over the service named by `K`
    pub fn keyed<K: ServiceKey>(&self) -> Keyed<'_, K> {
        Keyed::new(self)
    }

    /// Unique identifier of this scope
    pub fn scope_id(&self) -> Uuid {
        self.inner.scope_id
    }

    /// Configured label, if any
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// Number of ancestors above this container
    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    /// Number of local registrations
    pub fn len(&self) -> usize {
        self.read_table().len()
    }

    /// Check if the local table is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if two handles refer to the same container
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Serializable snapshot of this container's local registrations
    pub fn summary(&self) -> ScopeSummary {
        let services = self
            .read_table()
            .iter()
            .map(|(name, registration)| ServiceSummary {
                name: name.clone(),
                kind: registration.service_kind(),
                cached: registration.is_cached(),
                disposable: registration.disposer.is_some(),
                dependencies: registration.dependencies.clone(),
            })
            .collect();

        ScopeSummary {
            scope_id: self.inner.scope_id,
            label: self.inner.label.clone(),
            depth: self.inner.depth,
            disposed: self.is_disposed(),
            services,
        }
    }

    /// This container followed by its ancestors, nearest first
    fn ancestry(&self) -> impl Iterator<Item = &Container> {
        std::iter::successors(Some(self), |scope| scope.inner.parent.as_ref())
    }

    fn lookup(&self, name: &str) -> Result<Located, CoreError> {
        for scope in self.ancestry() {
            if let Some(registration) = scope.read_table().get(name) {
                return Ok(Located {
                    registration: registration.clone(),
                    owner: scope.clone(),
                });
            }
        }
        Err(CoreError::service_not_found(name))
    }

    /// Apply `update` to a local registration, if it still exists
    pub(crate) fn update_local<R>(
        &self,
        name: &str,
        update: impl FnOnce(&mut Registration) -> R,
    ) -> Option<R> {
        self.write_table().get_mut(name).map(update)
    }

    pub(crate) fn advise(&self, advisory: Advisory) {
        if self.inner.scope_warnings {
            self.inner.diagnostics.warn(&advisory);
        }
    }

    fn warn_if_scope_unsafe(&self, name: &str, owner: &Container) {
        if owner.ptr_eq(self) {
            return;
        }
        self.advise(Advisory::ScopeUnsafeSingleton {
            service: name.to_string(),
            owner_scope: owner.inner.scope_id,
            requesting_scope: self.inner.scope_id,
        });
    }

    fn state(&self) -> u8 {
        self.inner.state.load(Ordering::Acquire)
    }

    /// Registration is accepted only before disposal starts
    fn ensure_active(&self) -> Result<(), CoreError> {
        if self.state() != ACTIVE {
            return Err(CoreError::disposed(self.display_name()));
        }
        Ok(())
    }

    fn ensure_not_disposed(&self) -> Result<(), CoreError> {
        if self.is_disposed() {
            return Err(CoreError::disposed(self.display_name()));
        }
        Ok(())
    }

    /// Checked under the table lock, which `dispose` holds while it starts
    fn ensure_producing(&self) -> Result<(), CoreError> {
        let _table = self.read_table();
        self.ensure_active()
    }

    fn cache_singleton(
        &self,
        name: &str,
        cached: &OnceCell<ServiceAny>,
        value: ServiceAny,
    ) -> Result<ServiceAny, CoreError> {
        let _table = self.read_table();
        if let Some(landed) = cached.get() {
            return Ok(landed.clone());
        }
        self.ensure_active()?;

        match cached.set(value.clone()) {
            Ok(()) => {
                tracing::debug!(service = %name, scope = %self.inner.scope_id, "Cached singleton");
                Ok(value)
            }
            // An asynchronous production holds the slot; it wins.
            Err(_) => Ok(cached.get().cloned().unwrap_or(value)),
        }
    }

    fn display_name(&self) -> String {
        match &self.inner.label {
            Some(label) => label.clone(),
            None => self.inner.scope_id.to_string(),
        }
    }

    fn read_table(&self) -> RwLockReadGuard<'_, Table> {
        self.inner.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_table(&self) -> RwLockWriteGuard<'_, Table> {
        self.inner.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn downcast<T>(name: &str, value: ServiceAny) -> Result<Arc<T>, CoreError>
where
    T: Send + Sync + 'static,
{
    value
        .downcast::<T>()
        .map_err(|_| CoreError::type_mismatch::<T>(name))
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("scope_id", &self.inner.scope_id)
            .field("label", &self.inner.label)
            .field("depth", &self.inner.depth)
            .field("service_count", &self.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::diagnostics::MemorySink;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq)]
    struct Config {
        port: u16,
    }

    #[derive(Debug)]
    struct Server {
        port: u16,
    }

    #[test]
    fn test_instance_returns_same_value() {
        let container = Container::new();
        container
            .register_instance("config", Config { port: 3000 })
            .unwrap();

        let first = container.resolve::<Config>("config").unwrap();
        let second = container.resolve::<Config>("config").unwrap();

        assert_eq!(first.port, 3000);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unit_instance_is_a_valid_value() {
        let container = Container::new();
        container.register_instance("nothing", ()).unwrap();
        assert!(container.resolve::<()>("nothing").is_ok());
    }

    #[test]
    fn test_factory_produces_fresh_values() {
        let calls = Arc::new(AtomicUsize::new(0));
        let container = Container::new();
        let counter = calls.clone();
        container
            .register_factory("id", move |_| Ok(counter.fetch_add(1, Ordering::SeqCst)))
            .unwrap();

        let first = container.resolve::<usize>("id").unwrap();
        let second = container.resolve::<usize>("id").unwrap();

        assert_eq!((*first, *second), (0, 1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_singleton_produced_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let container = Container::new();
        container
            .register_instance("config", Config { port: 3000 })
            .unwrap();
        let counter = calls.clone();
        container
            .register_singleton("server", move |c| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Server {
                    port: c.resolve::<Config>("config")?.port,
                })
            })
            .unwrap();

        let first = container.resolve::<Server>("server").unwrap();
        let second = container.resolve::<Server>("server").unwrap();

        assert_eq!(first.port, 3000);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_not_found_names_service() {
        let container = Container::new();
        let err = container.resolve::<Config>("missing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.service(), Some("missing"));
    }

    #[test]
    fn test_type_mismatch() {
        let container = Container::new();
        container.register_instance("port", 8080u16).unwrap();
        let err = container.resolve::<String>("port").unwrap_err();
        assert!(matches!(err, CoreError::TypeMismatch { .. }));
    }

    #[test]
    fn test_reregister_overwrites_in_place() {
        let container = Container::new();
        container.register_instance("a", 1u8).unwrap();
        container.register_instance("b", 2u8).unwrap();
        container.register_instance("a", 3u8).unwrap();

        assert_eq!(*container.resolve::<u8>("a").unwrap(), 3);
        assert_eq!(container.list(), vec!["a", "b"]);
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn test_producer_receives_requesting_container() {
        let root = Container::new();
        root.register_instance("tenant", "root".to_string()).unwrap();
        root.register_factory("greeting", |c| {
            Ok(format!("hello {}", c.resolve::<String>("tenant")?))
        })
        .unwrap();

        let child = root.create_child();
        child.register_instance("tenant", "acme".to_string()).unwrap();

        assert_eq!(*child.resolve::<String>("greeting").unwrap(), "hello acme");
        assert_eq!(*root.resolve::<String>("greeting").unwrap(), "hello root");
    }

    #[test]
    fn test_failed_singleton_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let container = Container::new();
        let counter = attempts.clone();
        container
            .register_singleton("flaky", move |_| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(CoreError::configuration("not yet"))
                } else {
                    Ok(42u32)
                }
            })
            .unwrap();

        let err = container.resolve::<u32>("flaky").unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(*container.resolve::<u32>("flaky").unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_has_never_produces() {
        let calls = Arc::new(AtomicUsize::new(0));
        let root = Container::new();
        let counter = calls.clone();
        root.register_singleton("svc", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(1u8)
        })
        .unwrap();
        let child = root.create_child();

        assert!(child.has("svc"));
        assert!(root.has("svc"));
        assert!(!child.has("other"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scope_unsafe_singleton_advisory() {
        let sink = Arc::new(MemorySink::new());
        let root = Container::builder().diagnostics(sink.clone()).build();
        root.register_singleton("svc", |_| Ok(1u8)).unwrap();

        let child = root.create_child();
        child.resolve::<u8>("svc").unwrap();
        // Cached now, so no second advisory.
        child.resolve::<u8>("svc").unwrap();
        root.resolve::<u8>("svc").unwrap();

        let advisories = sink.advisories();
        assert_eq!(advisories.len(), 1);
        assert!(matches!(
            &advisories[0],
            Advisory::ScopeUnsafeSingleton { service, owner_scope, requesting_scope }
                if service == "svc"
                    && *owner_scope == root.scope_id()
                    && *requesting_scope == child.scope_id()
        ));
    }

    #[test]
    fn test_owner_resolution_emits_no_advisory() {
        let sink = Arc::new(MemorySink::new());
        let root = Container::builder().diagnostics(sink.clone()).build();
        root.register_singleton("svc", |_| Ok(1u8)).unwrap();
        root.resolve::<u8>("svc").unwrap();
        root.create_child().resolve::<u8>("svc").unwrap();

        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_advisory_only_after_successful_production() {
        let sink = Arc::new(MemorySink::new());
        let root = Container::builder().diagnostics(sink.clone()).build();
        root.register_async_singleton("conn", |_| async { Ok::<_, CoreError>(1u8) }).unwrap();
        root.register_singleton("broken", |_| Err::<u8, _>(CoreError::configuration("down")))
            .unwrap();

        let child = root.create_child();
        assert!(child.resolve::<u8>("conn").unwrap_err().is_async_misuse());
        assert!(child.resolve::<u8>("broken").is_err());
        assert!(sink.is_empty());

        child.resolve_async::<u8>("conn").await.unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_declared_dependencies_advisory_only_for_singletons() {
        let sink = Arc::new(MemorySink::new());
        let container = Container::builder().diagnostics(sink.clone()).build();

        container
            .register_factory("f", |_| Ok(1u8))
            .unwrap()
            .depends_on(["db"]);
        container
            .register_singleton("s", |_| Ok(2u8))
            .unwrap()
            .depends_on(Vec::<String>::new());
        assert!(sink.is_empty());

        container
            .register_singleton("repo", |_| Ok(3u8))
            .unwrap()
            .depends_on(["db", "tenant"]);

        assert_eq!(
            sink.advisories(),
            vec![Advisory::SingletonDeclaresDependencies {
                service: "repo".to_string(),
                dependencies: vec!["db".to_string(), "tenant".to_string()],
            }]
        );
        assert_eq!(*container.resolve::<u8>("repo").unwrap(), 3);
    }

    #[test]
    fn test_scope_warnings_can_be_disabled() {
        let sink = Arc::new(MemorySink::new());
        let root = Container::builder()
            .diagnostics(sink.clone())
            .scope_warnings(false)
            .build();
        root.register_singleton("svc", |_| Ok(1u8))
            .unwrap()
            .depends_on(["x"]);
        root.create_child().resolve::<u8>("svc").unwrap();

        assert!(sink.is_empty());
    }

    #[test]
    fn test_clear_is_local_and_keeps_container_usable() {
        let root = Container::new();
        root.register_instance("shared", 1u8).unwrap();
        let child = root.create_child();
        child.register_instance("local", 2u8).unwrap();

        child.clear();

        assert!(child.is_empty());
        assert!(!child.is_disposed());
        assert!(child.has("shared"));
        assert!(!child.has("local"));
        child.register_instance("again", 3u8).unwrap();
    }

    #[test]
    fn test_parent_accessors() {
        let root = Container::new();
        let child = root.create_child();

        assert!(root.parent().is_none());
        assert!(root.parent_or_current().ptr_eq(&root));
        assert!(child.parent().unwrap().ptr_eq(&root));
        assert!(child.parent_or_current().ptr_eq(&root));
        assert_eq!(child.depth(), 1);
        assert_eq!(child.create_child().depth(), 2);
    }

    #[test]
    fn test_producer_may_register_reentrantly() {
        let container = Container::new();
        container
            .register_factory("bootstrap", |c| {
                c.register_instance("late", 9u8)?;
                Ok(())
            })
            .unwrap();

        container.resolve::<()>("bootstrap").unwrap();
        assert_eq!(*container.resolve::<u8>("late").unwrap(), 9);
    }

    #[test]
    fn test_summary_reports_local_entries() {
        let container = Container::builder().label("root").build();
        container.register_instance("config", 1u8).unwrap();
        container
            .register_singleton("server", |_| Ok(2u8))
            .unwrap()
            .depends_on(["config"]);
        container.resolve::<u8>("server").unwrap();

        let summary = container.summary();
        assert_eq!(summary.label.as_deref(), Some("root"));
        assert_eq!(summary.services.len(), 2);
        assert!(summary.services[1].cached);
        assert_eq!(summary.services[1].dependencies, vec!["config"]);
    }

    #[test]
    fn test_container_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Container>();
    }

    #[test]
    fn test_debug_does_not_expose_values() {
        let container = Container::builder().label("debug").build();
        container
            .register_instance("secret", Mutex::new("hunter2".to_string()))
            .unwrap();

        let rendered = format!("{:?}", container);
        assert!(rendered.contains("service_count: 1"));
        assert!(!rendered.contains("hunter2"));
    }
}
