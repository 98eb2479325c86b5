use serde::Serialize;
use uuid::Uuid;

use crate::container::kind::ServiceKind;

/// Snapshot of one container's local registrations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeSummary {
    pub scope_id: Uuid,
    pub label: Option<String>,
    pub depth: usize,
    pub disposed: bool,
    pub services: Vec<ServiceSummary>,
}

/// Snapshot of a single registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    pub name: String,
    pub kind: ServiceKind,
    /// Singleton cache populated
    pub cached: bool,
    pub disposable: bool,
    pub dependencies: Vec<String>,
}

impl ScopeSummary {
    /// Look up a service entry by name
    pub fn service(&self, name: &str) -> Option<&ServiceSummary> {
        self.services.iter().find(|service| service.name == name)
    }

    /// Number of entries of the given kind
    pub fn count_of(&self, kind: ServiceKind) -> usize {
        self.services
            .iter()
            .filter(|service| service.kind == kind)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;

    #[test]
    fn test_summary_serializes_to_json() {
        let container = Container::new();
        container.register_instance("config", 1u8).unwrap();
        container.register_factory("request_id", |_| Ok(7u64)).unwrap();

        let summary = container.summary();
        assert_eq!(summary.count_of(ServiceKind::Factory), 1);
        assert_eq!(summary.service("config").unwrap().kind, ServiceKind::Instance);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["depth"], 0);
        assert_eq!(json["disposed"], false);
        assert_eq!(json["services"][1]["name"], "request_id");
        assert_eq!(json["services"][1]["kind"], "factory");
    }
}
