//! Typed service keys
//!
//! Containers store services under string names and hand them back as
//! `Arc<dyn Any>`. A [`ServiceKey`] pins a name to the type stored under it,
//! so registration and resolution through [`Keyed`] are checked at compile
//! time instead of failing with a type mismatch at runtime.
//!
//! ## Usage
//!
//! ```rust
//! use scoped_di::{Container, ServiceKey};
//!
//! struct Settings {
//!     port: u16,
//! }
//!
//! struct SettingsKey;
//! impl ServiceKey for SettingsKey {
//!     const NAME: &'static str = "settings";
//!     type Service = Settings;
//! }
//!
//! let container = Container::new();
//! container.keyed::<SettingsKey>().register_instance(Settings { port: 8080 })?;
//!
//! let settings = container.keyed::<SettingsKey>().resolve()?;
//! assert_eq!(settings.port, 8080);
//! // The key is only a name; untyped access still works.
//! assert!(container.has("settings"));
//! # Ok::<(), scoped_di::CoreError>(())
//! ```
//!
//! ## Naming Convention
//!
//! Keys are zero-sized marker types and conventionally end with `Key`.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::container::Container;
use crate::container::lifecycle::Disposable;
use crate::container::registration::RegistrationHandle;
use crate::errors::CoreError;

/// Compile-time mapping from a service name to its type
pub trait ServiceKey: 'static {
    /// Name the service is registered under
    const NAME: &'static str;

    /// Type stored under [`Self::NAME`]
    type Service: Send + Sync + 'static;

    /// Get the key type name for diagnostics
    fn key_type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Get the service type name for diagnostics
    fn service_type_name() -> &'static str {
        std::any::type_name::<Self::Service>()
    }
}

/// Typed view of one named service in a container
pub struct Keyed<'a, K: ServiceKey> {
    container: &'a Container,
    _key: PhantomData<fn() -> K>,
}

impl<'a, K: ServiceKey> Keyed<'a, K> {
    pub(crate) fn new(container: &'a Container) -> Self {
        Self {
            container,
            _key: PhantomData,
        }
    }

    /// Register a pre-built value under the key's name
    pub fn register_instance(
        &self,
        value: K::Service,
    ) -> Result<RegistrationHandle<'a, K::Service>, CoreError> {
        self.container.register_instance(K::NAME, value)
    }

    /// Register a pre-built value that is disposed with the container
    pub fn register_disposable_instance(
        &self,
        value: K::Service,
    ) -> Result<RegistrationHandle<'a, K::Service>, CoreError>
    where
        K::Service: Disposable,
    {
        self.container.register_disposable_instance(K::NAME, value)
    }

    /// Register a producer invoked on every resolution
    pub fn register_factory<F>(
        &self,
        producer: F,
    ) -> Result<RegistrationHandle<'a, K::Service>, CoreError>
    where
        F: Fn(&Container) -> Result<K::Service, CoreError> + Send + Sync + 'static,
    {
        self.container.register_factory(K::NAME, producer)
    }

    /// Register an asynchronous producer invoked on every resolution
    pub fn register_async_factory<F, Fut>(
        &self,
        producer: F,
    ) -> Result<RegistrationHandle<'a, K::Service>, CoreError>
    where
        F: Fn(Container) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<K::Service, CoreError>> + Send + 'static,
    {
        self.container.register_async_factory(K::NAME, producer)
    }

    /// Register a lazily cached producer
    pub fn register_singleton<F>(
        &self,
        producer: F,
    ) -> Result<RegistrationHandle<'a, K::Service>, CoreError>
    where
        F: Fn(&Container) -> Result<K::Service, CoreError> + Send + Sync + 'static,
    {
        self.container.register_singleton(K::NAME, producer)
    }

    /// Register a lazily cached asynchronous producer
    pub fn register_async_singleton<F, Fut>(
        &self,
        producer: F,
    ) -> Result<RegistrationHandle<'a, K::Service>, CoreError>
    where
        F: Fn(Container) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<K::Service, CoreError>> + Send + 'static,
    {
        self.container.register_async_singleton(K::NAME, producer)
    }

    /// Resolve the service synchronously
    pub fn resolve(&self) -> Result<Arc<K::Service>, CoreError> {
        self.container.resolve::<K::Service>(K::NAME)
    }

    /// Resolve the service, awaiting asynchronous producers
    pub async fn resolve_async(&self) -> Result<Arc<K::Service>, CoreError> {
        self.container.resolve_async::<K::Service>(K::NAME).await
    }

    /// Check if the service is visible from the container
    pub fn has(&self) -> bool {
        self.container.has(K::NAME)
    }
}

impl<K: ServiceKey> std::fmt::Debug for Keyed<'_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyed")
            .field("name", &K::NAME)
            .field("service_type", &K::service_type_name())
            .field("scope_id", &self.container.scope_id())
            .finish()
    }
}
