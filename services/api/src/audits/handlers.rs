use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use blink_common::error::BlinkError;
use blink_db::audits::models::AuditFilter;
use blink_db::audits::repositories::AuditRepository;

use crate::audits::responses::{AuditHistoryResponse, LatestScoreResponse};
use crate::error::ApiError;
use crate::AppState;

pub async fn latest_score(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<LatestScoreResponse>, ApiError> {
    let audit = state
        .audit_repo
        .latest_for_user(user_id)
        .await?
        .ok_or_else(|| BlinkError::NotFound(format!("no score audit for user {user_id}")))?;

    Ok(Json(LatestScoreResponse { data: audit }))
}

pub async fn list_audits(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(filter): Query<AuditFilter>,
) -> Result<Json<AuditHistoryResponse>, ApiError> {
    let data = state.audit_repo.list_for_user(user_id, filter).await?;
    let count = data.len();
    Ok(Json(AuditHistoryResponse { data, count }))
}
