use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use blink_common::error::BlinkError;
use blink_db::audits::models::RiskScoreAudit;
use blink_db::audits::repositories::AuditRepository;
use blink_db::reports::repositories::ReportRepository;
use blink_scoring::{score_report, OverrideMap, ReportContext, ScoringError, Transaction};

use crate::error::ApiError;
use crate::score::requests::{BatchScoreRequest, ScoreRequest};
use crate::score::responses::{
    BatchOutcome, BatchScoreResponse, InsufficientHistoryResponse, ScoreResponse,
};
use crate::AppState;

/// Score an inline payload. Malformed transaction rows are logged and
/// dropped; they never abort the request.
pub async fn score_user(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Response, ApiError> {
    let mut transactions: Vec<Transaction> = Vec::with_capacity(request.transactions.len());
    let mut skipped_rows = 0usize;
    for row in &request.transactions {
        match row.parse() {
            Ok(tx) => transactions.push(tx),
            Err(reason) => {
                tracing::warn!(
                    user_id = %request.user_id,
                    transaction_id = %row.transaction_id,
                    %reason,
                    "skipping malformed transaction row"
                );
                skipped_rows += 1;
            }
        }
    }

    let balances: Vec<_> = request
        .historical_balances
        .iter()
        .map(|b| b.to_engine())
        .collect();
    let ctx = ReportContext {
        reference_date: request.reference_date,
        current_balance: request.current_balance,
    };
    let overrides: OverrideMap = request
        .overrides
        .iter()
        .map(|(id, body)| (id.clone(), body.to_engine()))
        .collect();

    match score_report(&transactions, &balances, &ctx, &overrides) {
        Ok(report) => {
            let audit_id = if request.persist {
                let audit = RiskScoreAudit::from_report(request.user_id, &report);
                Some(state.audit_repo.save_audit(audit).await?.id)
            } else {
                None
            };
            tracing::info!(
                user_id = %request.user_id,
                blink_score = report.blink_score,
                recommendation = report.recommendation.as_str(),
                skipped_rows,
                "scored user"
            );
            Ok(Json(ScoreResponse {
                user_id: request.user_id,
                audit_id,
                skipped_rows,
                report,
            })
            .into_response())
        }
        Err(ScoringError::InsufficientHistory { observed_days }) => {
            let audit_id = if request.persist {
                let audit = RiskScoreAudit::insufficient_history(request.user_id, observed_days);
                Some(state.audit_repo.save_audit(audit).await?.id)
            } else {
                None
            };
            tracing::info!(
                user_id = %request.user_id,
                observed_days,
                "rejected for insufficient history"
            );
            let body = InsufficientHistoryResponse {
                error: "insufficient_history",
                user_id: request.user_id,
                observed_days,
                audit_id,
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response())
        }
        Err(err @ ScoringError::Computation(_)) => {
            tracing::error!(user_id = %request.user_id, error = %err, "scoring computation failed");
            Err(err.into())
        }
    }
}

/// Score a batch of users from their stored asset reports. Per-user
/// failures are reported in the result list, never as a request failure.
pub async fn score_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchScoreRequest>,
) -> Result<Json<BatchScoreResponse>, ApiError> {
    if request.user_ids.is_empty() {
        return Err(BlinkError::Validation("user_ids must not be empty".to_string()).into());
    }

    let mut results = Vec::with_capacity(request.user_ids.len());
    for user_id in request.user_ids {
        results.push(score_stored_user(&state, user_id).await);
    }

    Ok(Json(BatchScoreResponse {
        batch_size: results.len(),
        results,
    }))
}

async fn score_stored_user(state: &AppState, user_id: Uuid) -> BatchOutcome {
    let report = match state.report_repo.latest_report_for_user(user_id).await {
        Ok(Some(report)) => report,
        Ok(None) => {
            return BatchOutcome {
                user_id,
                status: "skipped",
                blink_score: None,
                recommendation: None,
                detail: Some("no asset report".to_string()),
            }
        }
        Err(e) => return failed(user_id, e),
    };

    let transactions = match state.report_repo.transactions_for_report(report.id).await {
        Ok(rows) => rows.iter().map(|r| r.to_engine()).collect::<Vec<_>>(),
        Err(e) => return failed(user_id, e),
    };
    let balances = match state.report_repo.balances_for_report(report.id).await {
        Ok(rows) => rows.iter().map(|r| r.to_engine()).collect::<Vec<_>>(),
        Err(e) => return failed(user_id, e),
    };

    match score_report(&transactions, &balances, &report.context(), &Default::default()) {
        Ok(scored) => {
            let audit = RiskScoreAudit::from_report(user_id, &scored);
            if let Err(e) = state.audit_repo.save_audit(audit).await {
                return failed(user_id, e);
            }
            BatchOutcome {
                user_id,
                status: "scored",
                blink_score: Some(scored.blink_score),
                recommendation: Some(scored.recommendation.as_str().to_string()),
                detail: None,
            }
        }
        Err(ScoringError::InsufficientHistory { observed_days }) => {
            let audit = RiskScoreAudit::insufficient_history(user_id, observed_days);
            if let Err(e) = state.audit_repo.save_audit(audit).await {
                return failed(user_id, e);
            }
            BatchOutcome {
                user_id,
                status: "insufficient_history",
                blink_score: None,
                recommendation: Some("rejected".to_string()),
                detail: Some(format!("{observed_days} observed days")),
            }
        }
        Err(ScoringError::Computation(message)) => failed(user_id, BlinkError::Scoring(message)),
    }
}

fn failed(user_id: Uuid, error: BlinkError) -> BatchOutcome {
    tracing::error!(%user_id, %error, "batch scoring failed for user");
    BatchOutcome {
        user_id,
        status: "failed",
        blink_score: None,
        recommendation: None,
        detail: Some(error.to_string()),
    }
}
