use async_trait::async_trait;
use uuid::Uuid;

use crate::reports::models::{AssetReport, StoredBalance, StoredTransaction};
use blink_common::error::BlinkResult;

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn latest_report_for_user(&self, user_id: Uuid) -> BlinkResult<Option<AssetReport>>;
    async fn transactions_for_report(
        &self,
        report_id: Uuid,
    ) -> BlinkResult<Vec<StoredTransaction>>;
    async fn balances_for_report(&self, report_id: Uuid) -> BlinkResult<Vec<StoredBalance>>;
    /// Users whose newest report spans at least `min_history_days` of
    /// transactions — the rescoring worker's work list.
    async fn users_with_scorable_data(
        &self,
        min_history_days: i64,
        limit: i64,
    ) -> BlinkResult<Vec<Uuid>>;
}
