use serde::Serialize;

/// How a registration produces its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Pre-built value returned unchanged
    Instance,
    /// New value produced on every resolution
    Factory,
    /// Produced once, lazily, and cached on the owning container
    Singleton,
}

impl ServiceKind {
    /// Check if the kind is instance
    pub fn is_instance(&self) -> bool {
        matches!(self, ServiceKind::Instance)
    }

    /// Check if the kind is factory
    pub fn is_factory(&self) -> bool {
        matches!(self, ServiceKind::Factory)
    }

    /// Check if the kind is singleton
    pub fn is_singleton(&self) -> bool {
        matches!(self, ServiceKind::Singleton)
    }

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Instance => "instance",
            ServiceKind::Factory => "factory",
            ServiceKind::Singleton => "singleton",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ServiceKind {
    type Err = crate::errors::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "instance" => Ok(ServiceKind::Instance),
            "factory" => Ok(ServiceKind::Factory),
            "singleton" => Ok(ServiceKind::Singleton),
            _ => Err(crate::errors::CoreError::InvalidServiceKind {
                kind: s.to_string(),
            }),
        }
    }
}
