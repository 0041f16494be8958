//! Keyword and category rules for transaction classification.
//!
//! Keyword rules are whole-word, case-insensitive matches compiled once.

use regex::Regex;
use std::sync::LazyLock;

/// Category-path element that marks a payroll deposit.
pub const PAYROLL_CATEGORY_TOKEN: &str = "Payroll";
/// Category-id prefix that marks a payroll deposit.
pub const PAYROLL_CATEGORY_ID_PREFIX: &str = "21006";

/// Category-path elements that mark a loan or credit-card payment.
pub const LOAN_CATEGORY_TOKENS: &[&str] = &["Loan Payment", "Credit Card Payment"];
/// Category-id prefix that marks a loan payment.
pub const LOAN_CATEGORY_ID_PREFIX: &str = "23005";

/// Exact category id banks use for overdraft fees.
pub const ODFEE_CATEGORY_ID: &str = "22001000";

static PAYROLL_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(ADP|PAYROLL|PAYCHEX|PAYROLL CORP|GUSTO|TRINET|INTUIT PAYROLL|BAMBOOHR)\b")
        .expect("payroll keyword pattern")
});

static LOAN_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(FINANCE|LOAN|CREDIT|CAPITAL ONE|DISCOVER|CHASE CARD|AMEX)\b")
        .expect("loan keyword pattern")
});

static GENERIC_PAYMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPAYMENT\b").expect("payment pattern"));

static P2P_PROVIDERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(ZELLE|VENMO|CASH APP|PAYPAL)\b").expect("p2p provider pattern")
});

static ODFEE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(OVERDRAFT|OD FEE|RET ITEM FEE|NSF FEE)\b").expect("overdraft fee pattern")
});

pub fn matches_payroll_keyword(text: &str) -> bool {
    PAYROLL_KEYWORDS.is_match(text)
}

pub fn matches_loan_keyword(text: &str) -> bool {
    LOAN_KEYWORDS.is_match(text)
}

/// A bare "payment" counts only when it is not a P2P transfer.
pub fn is_generic_payment(text: &str) -> bool {
    GENERIC_PAYMENT.is_match(text) && !P2P_PROVIDERS.is_match(text)
}

pub fn matches_odfee_keyword(text: &str) -> bool {
    ODFEE_KEYWORDS.is_match(text)
}

/// "Contains token" means some path element equals the token literally.
pub fn category_contains(path: &[String], token: &str) -> bool {
    path.iter().any(|element| element == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payroll_keywords_match_whole_words() {
        assert!(matches_payroll_keyword("ADP PAYROLL DEPOSIT"));
        assert!(matches_payroll_keyword("Direct Dep gusto inc"));
        assert!(matches_payroll_keyword("TRINET HR"));
        assert!(!matches_payroll_keyword("GADPET SUPPLIES"));
        assert!(!matches_payroll_keyword("PAYROLLING"));
    }

    #[test]
    fn payroll_keywords_case_insensitive() {
        assert!(matches_payroll_keyword("paychex tps"));
        assert!(matches_payroll_keyword("BambooHR payroll run"));
    }

    #[test]
    fn loan_keywords_match() {
        assert!(matches_loan_keyword("CAPITAL ONE AUTOPAY"));
        assert!(matches_loan_keyword("honda finance corp"));
        assert!(matches_loan_keyword("CHASE CARD SERVICES"));
        assert!(!matches_loan_keyword("CREDITSAFE REPORT"));
    }

    #[test]
    fn generic_payment_excludes_p2p() {
        assert!(is_generic_payment("AUTO PAYMENT RECEIVED"));
        assert!(!is_generic_payment("ZELLE PAYMENT TO JOHN"));
        assert!(!is_generic_payment("VENMO PAYMENT"));
        assert!(!is_generic_payment("CASH APP PAYMENT SENT"));
        assert!(!is_generic_payment("PAYPAL INST XFER PAYMENT"));
        assert!(!is_generic_payment("PAYMENTS" /* not a whole word */));
    }

    #[test]
    fn odfee_keywords_match() {
        assert!(matches_odfee_keyword("OVERDRAFT ITEM FEE"));
        assert!(matches_odfee_keyword("od fee"));
        assert!(matches_odfee_keyword("RET ITEM FEE"));
        assert!(matches_odfee_keyword("NSF FEE CHARGED"));
        assert!(!matches_odfee_keyword("MONTHLY SERVICE FEE"));
    }

    #[test]
    fn category_contains_is_exact_element_match() {
        let path = vec!["Transfer".to_string(), "Payroll".to_string()];
        assert!(category_contains(&path, "Payroll"));
        assert!(!category_contains(&path, "Pay"));
        assert!(!category_contains(&path, "payroll"));
    }
}
