use blink_db::audits::models::RiskScoreAudit;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LatestScoreResponse {
    pub data: RiskScoreAudit,
}

#[derive(Debug, Serialize)]
pub struct AuditHistoryResponse {
    pub data: Vec<RiskScoreAudit>,
    pub count: usize,
}
