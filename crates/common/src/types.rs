use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity block each service exposes on its /info endpoint. Scores are
/// only comparable across deployments running the same rule engine, so the
/// engine version travels alongside the binary version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    /// Version tag of the rule engine this deployment scores with; audit
    /// rows carry the same tag.
    pub engine_version: String,
    pub instance_id: Uuid,
}

impl ServiceInfo {
    pub fn new(service: &str, engine_version: &str) -> Self {
        Self {
            service: service.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            engine_version: engine_version.to_owned(),
            instance_id: Uuid::new_v4(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stamps_service_and_engine_versions() {
        let info = ServiceInfo::new("blink-api", "blink-rules-1.0");
        assert_eq!(info.service, "blink-api");
        assert_eq!(info.engine_version, "blink-rules-1.0");
        assert!(!info.version.is_empty());
    }

    #[test]
    fn instances_get_distinct_ids() {
        let a = ServiceInfo::new("blink-api", "blink-rules-1.0");
        let b = ServiceInfo::new("blink-api", "blink-rules-1.0");
        assert_ne!(a.instance_id, b.instance_id);
    }
}
