//! Batch rescoring worker.
//!
//! One-shot run: find users whose stored history is long enough to score,
//! score each from their latest asset report, persist the audit rows, and
//! log a summary. Meant to be invoked on a schedule by the platform cron.

mod worker;

use blink_config::AppConfig;
use blink_db::audits::pg_repository::PgAuditRepository;
use blink_db::reports::pg_repository::PgReportRepository;

use crate::worker::RescoringWorker;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load config");
    config.init_tracing();
    tracing::info!(
        service = "blink-scheduler",
        batch_size = config.batch_size,
        dry_run = config.dry_run,
        "starting"
    );

    let pool = blink_db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    let worker = RescoringWorker::new(
        PgReportRepository::new(pool.clone()),
        PgAuditRepository::new(pool),
        config.dry_run,
    );

    match worker.run_batch(config.batch_size as i64).await {
        Ok(stats) => {
            tracing::info!(
                processed = stats.processed,
                succeeded = stats.succeeded,
                failed = stats.failed,
                skipped = stats.skipped,
                "rescoring batch completed"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "rescoring batch failed");
        }
    }
}
