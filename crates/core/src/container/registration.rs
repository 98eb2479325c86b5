use std::any::Any;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::OnceCell;

use crate::container::container::Container;
use crate::container::diagnostics::Advisory;
use crate::container::kind::ServiceKind;
use crate::container::lifecycle::{disposer_for, Disposable, Disposer};
use crate::errors::CoreError;

/// Type-erased service value as stored in a container
pub type ServiceAny = Arc<dyn Any + Send + Sync>;

/// Outcome of invoking a producer
pub(crate) enum Production {
    /// The value (or the producer's failure) is available immediately
    Ready(Result<ServiceAny, CoreError>),
    /// The value is still being produced
    Pending(BoxFuture<'static, Result<ServiceAny, CoreError>>),
}

impl Production {
    /// Take the value without waiting, failing if it is still pending
    pub(crate) fn now(self, service: &str) -> Result<ServiceAny, CoreError> {
        match self {
            Production::Ready(result) => result,
            Production::Pending(_) => Err(CoreError::async_misuse(service)),
        }
    }

    /// Wait for the value, treating a ready value as already resolved
    pub(crate) async fn settle(self) -> Result<ServiceAny, CoreError> {
        match self {
            Production::Ready(result) => result,
            Production::Pending(future) => future.await,
        }
    }
}

impl std::fmt::Debug for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Production::Ready(_) => f.debug_tuple("Ready").field(&"<value>").finish(),
            Production::Pending(_) => f.debug_tuple("Pending").field(&"<future>").finish(),
        }
    }
}

/// Producer invoked with the requesting container
pub(crate) type Producer = Arc<dyn Fn(&Container) -> Production + Send + Sync>;

pub(crate) fn sync_producer<T, F>(producer: F) -> Producer
where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> Result<T, CoreError> + Send + Sync + 'static,
{
    Arc::new(move |container: &Container| {
        Production::Ready(producer(container).map(|value| Arc::new(value) as ServiceAny))
    })
}

pub(crate) fn async_producer<T, F, Fut>(producer: F) -> Producer
where
    T: Send + Sync + 'static,
    F: Fn(Container) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
{
    Arc::new(move |container: &Container| {
        let pending = producer(container.clone());
        Production::Pending(
            async move { pending.await.map(|value| Arc::new(value) as ServiceAny) }.boxed(),
        )
    })
}

/// Registration payload by kind
#[derive(Clone)]
pub(crate) enum RegistrationKind {
    Instance(ServiceAny),
    Factory(Producer),
    Singleton {
        producer: Producer,
        cached: Arc<OnceCell<ServiceAny>>,
    },
}

/// One named binding in a container's local table
#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) kind: RegistrationKind,
    pub(crate) dependencies: Vec<String>,
    pub(crate) disposer: Option<Disposer>,
}

impl Registration {
    pub(crate) fn instance(value: ServiceAny) -> Self {
        Self::new(RegistrationKind::Instance(value))
    }

    pub(crate) fn factory(producer: Producer) -> Self {
        Self::new(RegistrationKind::Factory(producer))
    }

    pub(crate) fn singleton(producer: Producer) -> Self {
        Self::new(RegistrationKind::Singleton {
            producer,
            cached: Arc::new(OnceCell::new()),
        })
    }

    fn new(kind: RegistrationKind) -> Self {
        Self {
            kind,
            dependencies: Vec::new(),
            disposer: None,
        }
    }

    pub(crate) fn service_kind(&self) -> ServiceKind {
        match self.kind {
            RegistrationKind::Instance(_) => ServiceKind::Instance,
            RegistrationKind::Factory(_) => ServiceKind::Factory,
            RegistrationKind::Singleton { .. } => ServiceKind::Singleton,
        }
    }

    /// Whether a singleton's cache slot is populated
    pub(crate) fn is_cached(&self) -> bool {
        match &self.kind {
            RegistrationKind::Singleton { cached, .. } => cached.initialized(),
            _ => false,
        }
    }

    /// The value and hook to run on disposal, if this entry holds one
    ///
    /// An asynchronous production still in flight for a singleton is awaited
    /// so its value is disposed too. An empty slot stays empty.
    pub(crate) async fn disposal(&self, scope: &str) -> Option<(ServiceAny, Disposer)> {
        let disposer = self.disposer.clone()?;
        let value = match &self.kind {
            RegistrationKind::Instance(value) => value.clone(),
            RegistrationKind::Singleton { cached, .. } => cached
                .get_or_try_init(|| async { Err::<ServiceAny, _>(CoreError::disposed(scope)) })
                .await
                .ok()?
                .clone(),
            RegistrationKind::Factory(_) => return None,
        };
        Some((value, disposer))
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("kind", &self.service_kind())
            .field("cached", &self.is_cached())
            .field("dependencies", &self.dependencies)
            .field("disposable", &self.disposer.is_some())
            .finish()
    }
}

/// Handle returned by registration calls for optional per-entry settings
///
/// ```rust
/// use scoped_di::{Container, CoreError, Disposable};
///
/// struct Pool;
///
/// #[async_trait::async_trait]
/// impl Disposable for Pool {
///     async fn dispose(&self) -> Result<(), CoreError> {
///         Ok(())
///     }
/// }
///
/// let container = Container::new();
/// container
///     .register_singleton("pool", |_| Ok(Pool))?
///     .disposable()
///     .depends_on(["config"]);
/// # Ok::<(), CoreError>(())
/// ```
pub struct RegistrationHandle<'a, T> {
    container: &'a Container,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> RegistrationHandle<'a, T>
where
    T: Send + Sync + 'static,
{
    pub(crate) fn new(container: &'a Container, name: String) -> Self {
        Self {
            container,
            name,
            _marker: PhantomData,
        }
    }

    /// Name of the registered service
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare the services the producer reads
    ///
    /// Advisory only. A singleton declaring dependencies is reported to the
    /// container's diagnostics sink because those dependencies may be
    /// scoped services captured into a shared value. Instances ignore it.
    pub fn depends_on<I, S>(self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dependencies: Vec<String> = dependencies.into_iter().map(Into::into).collect();
        let kind = self.container.update_local(&self.name, |registration| {
            if !matches!(registration.kind, RegistrationKind::Instance(_)) {
                registration.dependencies = dependencies.clone();
            }
            registration.service_kind()
        });

        if kind == Some(ServiceKind::Singleton) && !dependencies.is_empty() {
            self.container.advise(Advisory::SingletonDeclaresDependencies {
                service: self.name.clone(),
                dependencies,
            });
        }
        self
    }

    /// Dispose the held value when the owning container is disposed
    ///
    /// Applies to instances and to singletons once cached. Factories never
    /// hold a value, so the setting has no effect on them.
    pub fn disposable(self) -> Self
    where
        T: Disposable,
    {
        let disposer = disposer_for::<T>(self.name.clone());
        self.container.update_local(&self.name, |registration| {
            registration.disposer = Some(disposer);
        });
        self
    }
}

impl<T> std::fmt::Debug for RegistrationHandle<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationHandle")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
