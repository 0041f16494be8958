//! Heuristic transaction tagging.
//!
//! Each transaction is classified independently as payroll, loan payment
//! and/or overdraft fee. Payroll carries a confidence weight derived from
//! how many of three rules agreed (category, keyword, cadence); the cadence
//! rule runs as a post-pass over the whole set. Caller-supplied overrides
//! are applied last and win unconditionally.

pub mod cadence;
pub mod patterns;

use crate::model::{
    OverrideMap, ReportContext, TaggedTransaction, Transaction, RULE_CATEGORY, RULE_KEYWORD,
};

/// Confidence weight from the number of payroll rules that fired.
pub fn confidence_from_mask(mask: u8) -> f64 {
    match mask.count_ones() {
        3 => 1.0,
        2 => 0.5,
        1 => 0.2,
        _ => 0.0,
    }
}

/// Tag every transaction, run the cadence post-pass, then apply overrides.
pub fn tag_transactions(
    transactions: &[Transaction],
    ctx: &ReportContext,
    overrides: &OverrideMap,
) -> Vec<TaggedTransaction> {
    let mut tagged: Vec<TaggedTransaction> = transactions.iter().cloned().map(tag_one).collect();
    cadence::mark_recurring_deposits(&mut tagged, ctx.reference_date);
    apply_overrides(&mut tagged, overrides);
    tagged
}

fn tag_one(tx: Transaction) -> TaggedTransaction {
    let mut mask = 0u8;
    if tx.is_inflow() {
        if payroll_category_rule(&tx) {
            mask |= RULE_CATEGORY;
        }
        if payroll_keyword_rule(&tx) {
            mask |= RULE_KEYWORD;
        }
    }
    let weight = confidence_from_mask(mask);

    let is_loanpay = tx.is_outflow() && loanpay_rule(&tx);
    let is_odfee = odfee_rule(&tx);

    TaggedTransaction {
        is_payroll: weight > 0.0,
        is_loanpay,
        is_odfee,
        payroll_rule_mask: mask,
        payroll_confidence_weight: weight,
        transaction: tx,
    }
}

fn payroll_category_rule(tx: &Transaction) -> bool {
    if patterns::category_contains(&tx.category, patterns::PAYROLL_CATEGORY_TOKEN) {
        return true;
    }
    tx.category_id
        .as_deref()
        .is_some_and(|id| id.starts_with(patterns::PAYROLL_CATEGORY_ID_PREFIX))
}

fn payroll_keyword_rule(tx: &Transaction) -> bool {
    tx.merchant_name
        .as_deref()
        .is_some_and(patterns::matches_payroll_keyword)
        || tx
            .description
            .as_deref()
            .is_some_and(patterns::matches_payroll_keyword)
}

/// Loan/credit-payment rules in priority order; the first match wins.
fn loanpay_rule(tx: &Transaction) -> bool {
    let by_category = patterns::LOAN_CATEGORY_TOKENS
        .iter()
        .any(|token| patterns::category_contains(&tx.category, token))
        || tx
            .category_id
            .as_deref()
            .is_some_and(|id| id.starts_with(patterns::LOAN_CATEGORY_ID_PREFIX));
    if by_category {
        return true;
    }

    let Some(description) = tx.description.as_deref() else {
        return false;
    };
    if patterns::matches_loan_keyword(description) {
        return true;
    }
    patterns::is_generic_payment(description)
}

fn odfee_rule(tx: &Transaction) -> bool {
    if tx.category_id.as_deref() == Some(patterns::ODFEE_CATEGORY_ID) {
        return true;
    }
    tx.description
        .as_deref()
        .is_some_and(patterns::matches_odfee_keyword)
}

/// Overrides replace the automatic flags. Forcing payroll on pins the
/// weight to 1.0 (mask retained); forcing it off clears weight and mask.
/// Sign discipline still holds: payroll stays inflow-only and loan payments
/// outflow-only, so a sign-contradicting force-on is dropped.
fn apply_overrides(tagged: &mut [TaggedTransaction], overrides: &OverrideMap) {
    if overrides.is_empty() {
        return;
    }
    for t in tagged.iter_mut() {
        let Some(ov) = overrides.get(&t.transaction.id) else {
            continue;
        };
        if let Some(forced) = ov.is_payroll {
            if forced {
                if t.transaction.is_inflow() {
                    t.is_payroll = true;
                    t.payroll_confidence_weight = 1.0;
                }
            } else {
                t.is_payroll = false;
                t.payroll_confidence_weight = 0.0;
                t.payroll_rule_mask = 0;
            }
        }
        if let Some(forced) = ov.is_loanpay {
            t.is_loanpay = forced && t.transaction.is_outflow();
        }
    }
}
