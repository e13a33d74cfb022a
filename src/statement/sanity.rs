use rust_decimal::Decimal;

use crate::util::decimal::{parse_eur_decimal, parse_eur_decimal_opt};

use super::model::CashTransaction;

/// Allowed drift between the reported balance and the recomputed one.
/// Statements occasionally round half-cents away inside a row.
pub fn balance_tolerance() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

/// A cash transaction annotated with the result of the balance-continuity
/// check against its predecessor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckedCashTransaction {
    pub tx: CashTransaction,
    pub sanity_ok: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SanityCheckResult {
    pub transactions: Vec<CheckedCashTransaction>,
    pub failed_checks: u32,
}

/// Validates that each row's balance equals the previous balance plus
/// incoming minus outgoing, within tolerance.
///
/// The first row always passes (no predecessor). Rows whose own or
/// predecessor balance is unparseable pass as well: no check is performed
/// rather than flagging garbled text as a failure.
pub fn check_balance_continuity(
    transactions: &[CashTransaction],
) -> SanityCheckResult {
    let mut result = SanityCheckResult::default();
    for (i, tx) in transactions.iter().enumerate() {
        let mut sanity_ok = true;
        if i > 0 {
            let prev_saldo = parse_eur_decimal_opt(&transactions[i - 1].saldo);
            let cur_saldo = parse_eur_decimal_opt(&tx.saldo);
            if let (Some(prev), Some(cur)) = (prev_saldo, cur_saldo) {
                let eingang = parse_eur_decimal(&tx.zahlungseingang);
                let ausgang = parse_eur_decimal(&tx.zahlungsausgang);
                let expected = prev + eingang - ausgang;
                if (expected - cur).abs() > balance_tolerance() {
                    tracing::debug!(
                        "balance check failed at row {i}: expected {expected}, \
                         statement says {cur}"
                    );
                    sanity_ok = false;
                    result.failed_checks += 1;
                }
            }
        }
        result
            .transactions
            .push(CheckedCashTransaction { tx: tx.clone(), sanity_ok });
    }
    result
}

// MARK: tests
