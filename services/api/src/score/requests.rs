use blink_scoring::{DailyBalance, TagOverride, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Inline scoring request. Transaction rows arrive the way the data vendor
/// ships them — dates and amounts as strings — and are validated per row.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub user_id: uuid::Uuid,
    pub reference_date: NaiveDate,
    pub transactions: Vec<TransactionRow>,
    #[serde(default)]
    pub historical_balances: Vec<BalanceRow>,
    pub current_balance: Option<Decimal>,
    #[serde(default)]
    pub overrides: HashMap<String, OverrideBody>,
    #[serde(default = "default_persist")]
    pub persist: bool,
}

fn default_persist() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRow {
    pub transaction_id: String,
    pub date: String,
    pub amount: String,
    pub merchant_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub category: Vec<String>,
    pub category_id: Option<String>,
}

impl TransactionRow {
    /// Row-level validation; the batch never aborts on a bad row.
    pub fn parse(&self) -> Result<Transaction, String> {
        let date = NaiveDate::from_str(self.date.trim())
            .map_err(|e| format!("unparseable date {:?}: {e}", self.date))?;
        let amount = Decimal::from_str(self.amount.trim())
            .map_err(|e| format!("unparseable amount {:?}: {e}", self.amount))?;
        Ok(Transaction {
            id: self.transaction_id.clone(),
            date,
            amount,
            merchant_name: self.merchant_name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            category_id: self.category_id.clone(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceRow {
    pub date: NaiveDate,
    pub balance: Decimal,
}

impl BalanceRow {
    pub fn to_engine(&self) -> DailyBalance {
        DailyBalance {
            date: self.date,
            balance: self.balance,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OverrideBody {
    pub is_payroll: Option<bool>,
    pub is_loanpay: Option<bool>,
}

impl OverrideBody {
    pub fn to_engine(&self) -> TagOverride {
        TagOverride {
            is_payroll: self.is_payroll,
            is_loanpay: self.is_loanpay,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchScoreRequest {
    pub user_ids: Vec<uuid::Uuid>,
}
