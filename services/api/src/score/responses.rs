use blink_scoring::ScoreReport;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub user_id: Uuid,
    /// Audit row id when the run was persisted.
    pub audit_id: Option<Uuid>,
    /// Malformed transaction rows dropped before scoring.
    pub skipped_rows: usize,
    #[serde(flatten)]
    pub report: ScoreReport,
}

#[derive(Debug, Serialize)]
pub struct InsufficientHistoryResponse {
    pub error: &'static str,
    pub user_id: Uuid,
    pub observed_days: i64,
    pub audit_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct BatchScoreResponse {
    pub results: Vec<BatchOutcome>,
    pub batch_size: usize,
}

#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub user_id: Uuid,
    /// "scored", "insufficient_history", "skipped" or "failed".
    pub status: &'static str,
    pub blink_score: Option<f64>,
    pub recommendation: Option<String>,
    pub detail: Option<String>,
}
