use thiserror::Error;

/// Core error type for the scoped-di container
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Service not found: {service}")]
    ServiceNotFound { service: String },

    #[error(
        "Service '{service}' is produced asynchronously and cannot be resolved synchronously; use resolve_async instead"
    )]
    AsyncMisuse { service: String },

    #[error("Container '{scope}' has been disposed")]
    Disposed { scope: String },

    #[error("Service '{service}' is not of the requested type {expected}")]
    TypeMismatch { service: String, expected: String },

    #[error("Invalid service kind: {kind}")]
    InvalidServiceKind { kind: String },

    #[error("Service initialization failed for '{service}': {source}")]
    ServiceInitializationFailed {
        service: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Disposal failed for '{service}': {source}")]
    DisposalFailed {
        service: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CoreError {
    /// Create a new service not found error
    pub fn service_not_found(service: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            service: service.into(),
        }
    }

    /// Create a new async misuse error
    pub fn async_misuse(service: impl Into<String>) -> Self {
        Self::AsyncMisuse {
            service: service.into(),
        }
    }

    /// Create a new disposed error
    pub fn disposed(scope: impl Into<String>) -> Self {
        Self::Disposed {
            scope: scope.into(),
        }
    }

    /// Create a new type mismatch error for `T`
    pub fn type_mismatch<T: ?Sized>(service: impl Into<String>) -> Self {
        Self::TypeMismatch {
            service: service.into(),
            expected: std::any::type_name::<T>().to_string(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wrap a foreign error raised while a producer builds `service`
    pub fn initialization_failed(
        service: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ServiceInitializationFailed {
            service: service.into(),
            source: source.into(),
        }
    }

    /// Check if the error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ServiceNotFound { .. })
    }

    /// Check if the error is an async misuse error
    pub fn is_async_misuse(&self) -> bool {
        matches!(self, Self::AsyncMisuse { .. })
    }

    /// Check if the error is a disposed error
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Disposed { .. })
    }

    /// Check if the error is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::Yaml(_))
    }

    /// Name of the service the error refers to, if any
    pub fn service(&self) -> Option<&str> {
        match self {
            Self::ServiceNotFound { service }
            | Self::AsyncMisuse { service }
            | Self::TypeMismatch { service, .. }
            | Self::ServiceInitializationFailed { service, .. }
            | Self::DisposalFailed { service, .. } => Some(service),
            _ => None,
        }
    }
}
