use async_trait::async_trait;
use uuid::Uuid;

use crate::audits::models::{AuditFilter, RiskScoreAudit};
use blink_common::error::BlinkResult;

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn save_audit(&self, audit: RiskScoreAudit) -> BlinkResult<RiskScoreAudit>;
    async fn latest_for_user(&self, user_id: Uuid) -> BlinkResult<Option<RiskScoreAudit>>;
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: AuditFilter,
    ) -> BlinkResult<Vec<RiskScoreAudit>>;
}
