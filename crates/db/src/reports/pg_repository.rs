use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::reports::models::{AssetReport, StoredBalance, StoredTransaction};
use crate::reports::repositories::ReportRepository;
use blink_common::error::{BlinkError, BlinkResult};

#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn latest_report_for_user(&self, user_id: Uuid) -> BlinkResult<Option<AssetReport>> {
        let row = sqlx::query(
            "select id, user_id, reference_date, current_balance, created_at
             from asset_reports
             where user_id = $1
             order by created_at desc
             limit 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BlinkError::Database(e.to_string()))?;

        Ok(row.map(|r| map_report_row(&r)))
    }

    async fn transactions_for_report(
        &self,
        report_id: Uuid,
    ) -> BlinkResult<Vec<StoredTransaction>> {
        let rows = sqlx::query(
            "select id, asset_report_id, external_id, date, amount,
                    merchant_name, description, category, category_id
             from asset_report_transactions
             where asset_report_id = $1
             order by date asc, external_id asc",
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BlinkError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| StoredTransaction {
                id: r.get("id"),
                asset_report_id: r.get("asset_report_id"),
                external_id: r.get("external_id"),
                date: r.get("date"),
                amount: r.get("amount"),
                merchant_name: r.get("merchant_name"),
                description: r.get("description"),
                category: r.get("category"),
                category_id: r.get("category_id"),
            })
            .collect())
    }

    async fn balances_for_report(&self, report_id: Uuid) -> BlinkResult<Vec<StoredBalance>> {
        let rows = sqlx::query(
            "select asset_report_id, balance_date, balance
             from asset_report_historical_balances
             where asset_report_id = $1
             order by balance_date asc",
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BlinkError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| StoredBalance {
                asset_report_id: r.get("asset_report_id"),
                balance_date: r.get("balance_date"),
                balance: r.get("balance"),
            })
            .collect())
    }

    async fn users_with_scorable_data(
        &self,
        min_history_days: i64,
        limit: i64,
    ) -> BlinkResult<Vec<Uuid>> {
        let rows = sqlx::query(
            "with latest_reports as (
               select distinct on (user_id) id, user_id, reference_date
               from asset_reports
               order by user_id, created_at desc
             )
             select lr.user_id
             from latest_reports lr
             join asset_report_transactions t on t.asset_report_id = lr.id
             group by lr.user_id, lr.reference_date
             having lr.reference_date - min(t.date) + 1 >= $1
             limit $2",
        )
        .bind(min_history_days as i32)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BlinkError::Database(e.to_string()))?;

        Ok(rows.iter().map(|r| r.get("user_id")).collect())
    }
}

fn map_report_row(row: &sqlx::postgres::PgRow) -> AssetReport {
    AssetReport {
        id: row.get("id"),
        user_id: row.get("user_id"),
        reference_date: row.get("reference_date"),
        current_balance: row.get("current_balance"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
pub(crate) async fn ensure_report_tables(pool: &PgPool) {
    sqlx::query(
        "create table if not exists asset_reports (
          id uuid primary key,
          user_id uuid not null,
          reference_date date not null,
          current_balance numeric(14,2),
          created_at timestamptz not null default now()
        )",
    )
    .execute(pool)
    .await
    .expect("create asset_reports");

    sqlx::query(
        "create table if not exists asset_report_transactions (
          id uuid primary key,
          asset_report_id uuid not null references asset_reports(id) on delete cascade,
          external_id text not null,
          date date not null,
          amount numeric(14,2) not null,
          merchant_name text,
          description text,
          category text[],
          category_id text
        )",
    )
    .execute(pool)
    .await
    .expect("create asset_report_transactions");

    sqlx::query(
        "create table if not exists asset_report_historical_balances (
          asset_report_id uuid not null references asset_reports(id) on delete cascade,
          balance_date date not null,
          balance numeric(14,2) not null,
          primary key (asset_report_id, balance_date)
        )",
    )
    .execute(pool)
    .await
    .expect("create asset_report_historical_balances");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_pool;
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    async fn test_repo() -> Option<(PgReportRepository, PgPool)> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = create_pool(&url).await.expect("db should connect");
        ensure_report_tables(&pool).await;
        Some((PgReportRepository::new(pool.clone()), pool))
    }

    fn t0() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    async fn insert_report(pool: &PgPool, user_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "insert into asset_reports (id, user_id, reference_date, current_balance)
             values ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(user_id)
        .bind(t0())
        .bind(dec!(1200.00))
        .execute(pool)
        .await
        .expect("insert report");
        id
    }

    async fn insert_transaction(pool: &PgPool, report_id: Uuid, days_ago: i64, amount: Decimal) {
        sqlx::query(
            "insert into asset_report_transactions
             (id, asset_report_id, external_id, date, amount, category)
             values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(report_id)
        .bind(format!("ext-{}", Uuid::new_v4()))
        .bind(t0() - Duration::days(days_ago))
        .bind(amount)
        .bind(vec!["Transfer".to_string(), "Payroll".to_string()])
        .execute(pool)
        .await
        .expect("insert transaction");
    }

    #[tokio::test]
    async fn latest_report_picks_newest() {
        let (repo, pool) = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let user = Uuid::new_v4();
        insert_report(&pool, user).await;
        // Later insert wins on created_at.
        let newest = insert_report(&pool, user).await;

        let report = repo
            .latest_report_for_user(user)
            .await
            .expect("latest")
            .expect("present");
        assert_eq!(report.id, newest);
        assert_eq!(report.current_balance, Some(dec!(1200.00)));
    }

    #[tokio::test]
    async fn latest_report_none_for_unknown_user() {
        let (repo, _pool) = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let report = repo
            .latest_report_for_user(Uuid::new_v4())
            .await
            .expect("latest");
        assert!(report.is_none());
    }

    #[tokio::test]
    async fn transactions_come_back_in_date_order() {
        let (repo, pool) = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let user = Uuid::new_v4();
        let report_id = insert_report(&pool, user).await;
        insert_transaction(&pool, report_id, 3, dec!(-2000.00)).await;
        insert_transaction(&pool, report_id, 100, dec!(-2000.00)).await;
        insert_transaction(&pool, report_id, 17, dec!(300.00)).await;

        let transactions = repo
            .transactions_for_report(report_id)
            .await
            .expect("transactions");
        assert_eq!(transactions.len(), 3);
        assert!(transactions[0].date <= transactions[1].date);
        assert!(transactions[1].date <= transactions[2].date);
        assert_eq!(
            transactions[0].category.as_deref(),
            Some(&["Transfer".to_string(), "Payroll".to_string()][..])
        );
    }

    #[tokio::test]
    async fn balances_round_trip() {
        let (repo, pool) = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let user = Uuid::new_v4();
        let report_id = insert_report(&pool, user).await;
        for d in 1..=3 {
            sqlx::query(
                "insert into asset_report_historical_balances
                 (asset_report_id, balance_date, balance)
                 values ($1, $2, $3)",
            )
            .bind(report_id)
            .bind(t0() - Duration::days(d))
            .bind(dec!(800.00))
            .execute(&pool)
            .await
            .expect("insert balance");
        }

        let balances = repo.balances_for_report(report_id).await.expect("balances");
        assert_eq!(balances.len(), 3);
        assert_eq!(balances[0].balance, dec!(800.00));
    }

    #[tokio::test]
    async fn scorable_users_need_min_history() {
        let (repo, pool) = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let long_user = Uuid::new_v4();
        let short_user = Uuid::new_v4();

        let long_report = insert_report(&pool, long_user).await;
        insert_transaction(&pool, long_report, 150, dec!(-2000.00)).await;
        insert_transaction(&pool, long_report, 3, dec!(-2000.00)).await;

        let short_report = insert_report(&pool, short_user).await;
        insert_transaction(&pool, short_report, 40, dec!(-2000.00)).await;
        insert_transaction(&pool, short_report, 3, dec!(-2000.00)).await;

        let users = repo
            .users_with_scorable_data(90, 1000)
            .await
            .expect("scorable users");
        assert!(users.contains(&long_user));
        assert!(!users.contains(&short_user));
    }
}
