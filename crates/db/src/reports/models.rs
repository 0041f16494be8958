use blink_scoring::{DailyBalance, ReportContext, Transaction};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored bank-data snapshot for one user. The newest report per user is
/// the one scoring runs against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetReport {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Day the snapshot was taken; every lookback window ends here.
    pub reference_date: NaiveDate,
    pub current_balance: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl AssetReport {
    pub fn context(&self) -> ReportContext {
        ReportContext {
            reference_date: self.reference_date,
            current_balance: self.current_balance,
        }
    }
}

/// A transaction row as persisted with its report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub id: Uuid,
    pub asset_report_id: Uuid,
    /// Vendor-side transaction id; stable across re-pulls of the report.
    pub external_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub merchant_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Vec<String>>,
    pub category_id: Option<String>,
}

impl StoredTransaction {
    pub fn to_engine(&self) -> Transaction {
        Transaction {
            id: self.external_id.clone(),
            date: self.date,
            amount: self.amount,
            merchant_name: self.merchant_name.clone(),
            description: self.description.clone(),
            category: self.category.clone().unwrap_or_default(),
            category_id: self.category_id.clone(),
        }
    }
}

/// Historical end-of-day balance attached to a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBalance {
    pub asset_report_id: Uuid,
    pub balance_date: NaiveDate,
    pub balance: Decimal,
}

impl StoredBalance {
    pub fn to_engine(&self) -> DailyBalance {
        DailyBalance {
            date: self.balance_date,
            balance: self.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn report_context_carries_reference_and_balance() {
        let report = AssetReport {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            reference_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            current_balance: Some(dec!(1200)),
            created_at: Utc::now(),
        };
        let ctx = report.context();
        assert_eq!(ctx.reference_date, report.reference_date);
        assert_eq!(ctx.current_balance, Some(dec!(1200)));
    }

    #[test]
    fn stored_transaction_converts_with_external_id() {
        let stored = StoredTransaction {
            id: Uuid::new_v4(),
            asset_report_id: Uuid::new_v4(),
            external_id: "plaid-tx-991".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, 28).unwrap(),
            amount: dec!(-2000.00),
            merchant_name: Some("ADP".to_string()),
            description: None,
            category: None,
            category_id: Some("21006000".to_string()),
        };
        let tx = stored.to_engine();
        assert_eq!(tx.id, "plaid-tx-991");
        assert_eq!(tx.amount, dec!(-2000.00));
        assert!(tx.category.is_empty());
    }
}
