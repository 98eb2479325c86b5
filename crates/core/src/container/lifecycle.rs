use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};

use crate::container::registration::ServiceAny;
use crate::errors::CoreError;

/// Trait for services that need proper disposal/cleanup
///
/// Instances and cached singletons registered with a disposal capability are
/// disposed one after another, in registration order, when their owning
/// container is disposed.
#[async_trait]
pub trait Disposable: Send + Sync {
    /// Dispose of the service and clean up resources
    async fn dispose(&self) -> Result<(), CoreError>;
}

/// Type-erased disposal hook stored next to a registration
pub(crate) type Disposer =
    Arc<dyn Fn(ServiceAny) -> BoxFuture<'static, Result<(), CoreError>> + Send + Sync>;

/// Build a disposer that downcasts the stored value back to `T`
pub(crate) fn disposer_for<T>(service: String) -> Disposer
where
    T: Disposable + 'static,
{
    Arc::new(move |value: ServiceAny| {
        let service = service.clone();
        async move {
            let typed = value
                .downcast::<T>()
                .map_err(|_| CoreError::type_mismatch::<T>(service))?;
            typed.dispose().await
        }
        .boxed()
    })
}
