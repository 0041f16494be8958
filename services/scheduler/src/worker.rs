use uuid::Uuid;

use blink_common::error::{BlinkError, BlinkResult};
use blink_db::audits::models::RiskScoreAudit;
use blink_db::audits::repositories::AuditRepository;
use blink_db::reports::repositories::ReportRepository;
use blink_scoring::{score_report, ScoringError, MIN_HISTORY_DAYS};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub struct RescoringWorker<R, A> {
    report_repo: R,
    audit_repo: A,
    dry_run: bool,
}

impl<R: ReportRepository, A: AuditRepository> RescoringWorker<R, A> {
    pub fn new(report_repo: R, audit_repo: A, dry_run: bool) -> Self {
        Self {
            report_repo,
            audit_repo,
            dry_run,
        }
    }

    /// Score up to `batch_size` users with enough stored history. Per-user
    /// failures are counted and logged, never fatal to the batch.
    pub async fn run_batch(&self, batch_size: i64) -> BlinkResult<BatchStats> {
        let users = self
            .report_repo
            .users_with_scorable_data(MIN_HISTORY_DAYS, batch_size)
            .await?;
        tracing::info!(count = users.len(), "found users with scorable data");

        let mut stats = BatchStats::default();
        for user_id in users {
            stats.processed += 1;
            match self.score_user(user_id).await {
                Ok(true) => stats.succeeded += 1,
                Ok(false) => stats.skipped += 1,
                Err(e) => {
                    tracing::error!(%user_id, error = %e, "failed to rescore user");
                    stats.failed += 1;
                }
            }
        }
        Ok(stats)
    }

    /// Returns Ok(true) when an audit was produced, Ok(false) when the user
    /// had nothing scorable after all.
    async fn score_user(&self, user_id: Uuid) -> BlinkResult<bool> {
        let Some(report) = self.report_repo.latest_report_for_user(user_id).await? else {
            tracing::warn!(%user_id, "no asset report, skipping");
            return Ok(false);
        };

        let transactions: Vec<_> = self
            .report_repo
            .transactions_for_report(report.id)
            .await?
            .iter()
            .map(|t| t.to_engine())
            .collect();
        let balances: Vec<_> = self
            .report_repo
            .balances_for_report(report.id)
            .await?
            .iter()
            .map(|b| b.to_engine())
            .collect();

        let audit = match score_report(&transactions, &balances, &report.context(), &Default::default())
        {
            Ok(scored) => {
                tracing::info!(
                    %user_id,
                    blink_score = scored.blink_score,
                    recommendation = scored.recommendation.as_str(),
                    "scored user"
                );
                RiskScoreAudit::from_report(user_id, &scored)
            }
            Err(ScoringError::InsufficientHistory { observed_days }) => {
                tracing::info!(%user_id, observed_days, "insufficient history");
                RiskScoreAudit::insufficient_history(user_id, observed_days)
            }
            Err(ScoringError::Computation(message)) => {
                return Err(BlinkError::Scoring(message));
            }
        };

        if self.dry_run {
            tracing::info!(%user_id, "dry run, not persisting audit");
            return Ok(true);
        }

        self.audit_repo.save_audit(audit).await?;
        Ok(true)
    }
}
