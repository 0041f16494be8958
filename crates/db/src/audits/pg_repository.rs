use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::audits::models::{AuditFilter, RiskScoreAudit};
use crate::audits::repositories::AuditRepository;
use blink_common::error::{BlinkError, BlinkResult};

const AUDIT_COLUMNS: &str = "id, user_id, snapshot_timestamp, \
     metric_observed_history_days, metric_median_paycheck, metric_paycheck_regularity, \
     metric_days_since_last_paycheck, metric_overdraft_count90, metric_clean_buffer7, \
     metric_buffer_volatility, metric_deposit_multiplicity30, metric_net_cash30, \
     metric_debt_load30, metric_volatility90, \
     points_history_days, points_median_paycheck, points_paycheck_regularity, \
     points_days_since_last_paycheck, points_overdraft_count90, points_clean_buffer7, \
     points_buffer_volatility, points_deposit_multiplicity30, points_net_cash30, \
     points_debt_load30, points_volatility90, \
     base_score, blink_score, recommendation, \
     flag_od_vol, flag_cash_crunch, flag_debt_trap, \
     failure_reason, engine_version, created_at";

#[derive(Clone)]
pub struct PgAuditRepository {
    pool: PgPool,
}

impl PgAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PgAuditRepository {
    async fn save_audit(&self, audit: RiskScoreAudit) -> BlinkResult<RiskScoreAudit> {
        let query = format!(
            "insert into risk_score_audits ({AUDIT_COLUMNS})
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                     $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25,
                     $26, $27, $28, $29, $30, $31, $32, $33, $34)
             returning {AUDIT_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(audit.id)
            .bind(audit.user_id)
            .bind(audit.snapshot_timestamp)
            .bind(audit.metric_observed_history_days)
            .bind(audit.metric_median_paycheck)
            .bind(audit.metric_paycheck_regularity)
            .bind(audit.metric_days_since_last_paycheck)
            .bind(audit.metric_overdraft_count90)
            .bind(audit.metric_clean_buffer7)
            .bind(audit.metric_buffer_volatility)
            .bind(audit.metric_deposit_multiplicity30)
            .bind(audit.metric_net_cash30)
            .bind(audit.metric_debt_load30)
            .bind(audit.metric_volatility90)
            .bind(audit.points_history_days)
            .bind(audit.points_median_paycheck)
            .bind(audit.points_paycheck_regularity)
            .bind(audit.points_days_since_last_paycheck)
            .bind(audit.points_overdraft_count90)
            .bind(audit.points_clean_buffer7)
            .bind(audit.points_buffer_volatility)
            .bind(audit.points_deposit_multiplicity30)
            .bind(audit.points_net_cash30)
            .bind(audit.points_debt_load30)
            .bind(audit.points_volatility90)
            .bind(audit.base_score)
            .bind(audit.blink_score)
            .bind(&audit.recommendation)
            .bind(audit.flag_od_vol)
            .bind(audit.flag_cash_crunch)
            .bind(audit.flag_debt_trap)
            .bind(&audit.failure_reason)
            .bind(&audit.engine_version)
            .bind(audit.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| BlinkError::Database(e.to_string()))?;

        Ok(map_audit_row(&row))
    }

    async fn latest_for_user(&self, user_id: Uuid) -> BlinkResult<Option<RiskScoreAudit>> {
        let query = format!(
            "select {AUDIT_COLUMNS}
             from risk_score_audits
             where user_id = $1
             order by created_at desc
             limit 1"
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BlinkError::Database(e.to_string()))?;

        Ok(row.map(|r| map_audit_row(&r)))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: AuditFilter,
    ) -> BlinkResult<Vec<RiskScoreAudit>> {
        let query = format!(
            "select {AUDIT_COLUMNS}
             from risk_score_audits
             where user_id = $1
             order by created_at desc
             limit $2 offset $3"
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(filter.limit.unwrap_or(50))
            .bind(filter.offset.unwrap_or(0))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BlinkError::Database(e.to_string()))?;

        Ok(rows.iter().map(map_audit_row).collect())
    }
}

fn map_audit_row(row: &sqlx::postgres::PgRow) -> RiskScoreAudit {
    RiskScoreAudit {
        id: row.get("id"),
        user_id: row.get("user_id"),
        snapshot_timestamp: row.get("snapshot_timestamp"),
        metric_observed_history_days: row.get("metric_observed_history_days"),
        metric_median_paycheck: row.get("metric_median_paycheck"),
        metric_paycheck_regularity: row.get("metric_paycheck_regularity"),
        metric_days_since_last_paycheck: row.get("metric_days_since_last_paycheck"),
        metric_overdraft_count90: row.get("metric_overdraft_count90"),
        metric_clean_buffer7: row.get("metric_clean_buffer7"),
        metric_buffer_volatility: row.get("metric_buffer_volatility"),
        metric_deposit_multiplicity30: row.get("metric_deposit_multiplicity30"),
        metric_net_cash30: row.get("metric_net_cash30"),
        metric_debt_load30: row.get("metric_debt_load30"),
        metric_volatility90: row.get("metric_volatility90"),
        points_history_days: row.get("points_history_days"),
        points_median_paycheck: row.get("points_median_paycheck"),
        points_paycheck_regularity: row.get("points_paycheck_regularity"),
        points_days_since_last_paycheck: row.get("points_days_since_last_paycheck"),
        points_overdraft_count90: row.get("points_overdraft_count90"),
        points_clean_buffer7: row.get("points_clean_buffer7"),
        points_buffer_volatility: row.get("points_buffer_volatility"),
        points_deposit_multiplicity30: row.get("points_deposit_multiplicity30"),
        points_net_cash30: row.get("points_net_cash30"),
        points_debt_load30: row.get("points_debt_load30"),
        points_volatility90: row.get("points_volatility90"),
        base_score: row.get("base_score"),
        blink_score: row.get("blink_score"),
        recommendation: row.get("recommendation"),
        flag_od_vol: row.get("flag_od_vol"),
        flag_cash_crunch: row.get("flag_cash_crunch"),
        flag_debt_trap: row.get("flag_debt_trap"),
        failure_reason: row.get("failure_reason"),
        engine_version: row.get("engine_version"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
pub(crate) async fn ensure_audit_table(pool: &PgPool) {
    sqlx::query(
        "create table if not exists risk_score_audits (
          id uuid primary key,
          user_id uuid not null,
          snapshot_timestamp timestamptz not null,
          metric_observed_history_days bigint,
          metric_median_paycheck numeric(14,2),
          metric_paycheck_regularity double precision,
          metric_days_since_last_paycheck bigint,
          metric_overdraft_count90 bigint,
          metric_clean_buffer7 numeric(14,2),
          metric_buffer_volatility double precision,
          metric_deposit_multiplicity30 double precision,
          metric_net_cash30 numeric(14,2),
          metric_debt_load30 numeric(10,4),
          metric_volatility90 double precision,
          points_history_days integer,
          points_median_paycheck integer,
          points_paycheck_regularity integer,
          points_days_since_last_paycheck integer,
          points_overdraft_count90 integer,
          points_clean_buffer7 integer,
          points_buffer_volatility integer,
          points_deposit_multiplicity30 integer,
          points_net_cash30 integer,
          points_debt_load30 integer,
          points_volatility90 integer,
          base_score integer,
          blink_score double precision,
          recommendation text not null,
          flag_od_vol boolean not null default false,
          flag_cash_crunch boolean not null default false,
          flag_debt_trap boolean not null default false,
          failure_reason text,
          engine_version text not null,
          created_at timestamptz not null default now()
        )",
    )
    .execute(pool)
    .await
    .expect("create risk_score_audits");

    sqlx::query(
        "create index if not exists risk_score_audits_user_created_idx
         on risk_score_audits(user_id, created_at desc)",
    )
    .execute(pool)
    .await
    .expect("create risk_score_audits index");
}
