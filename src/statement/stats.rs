use itertools::Itertools;
use rust_decimal::Decimal;

use crate::util::decimal::parse_eur_decimal;

use super::model::CashTransaction;

/// Catch-all bucket for rows without a recognizable type cell.
const OTHER_TYPE_LABEL: &str = "Andere";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeCount {
    pub typ: String,
    pub count: usize,
}

/// Counts cash transactions per type, most frequent first (ties broken
/// alphabetically, for stable output).
pub fn transaction_type_breakdown(
    transactions: &[CashTransaction],
) -> Vec<TypeCount> {
    let mut counts: Vec<TypeCount> = transactions
        .iter()
        .map(|tx| {
            if tx.typ.is_empty() {
                OTHER_TYPE_LABEL
            } else {
                tx.typ.as_str()
            }
        })
        .counts()
        .into_iter()
        .map(|(typ, count)| TypeCount { typ: typ.to_string(), count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.typ.cmp(&b.typ)));
    counts
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CashFlowTotals {
    pub incoming: Decimal,
    pub outgoing: Decimal,
}

impl CashFlowTotals {
    pub fn net(&self) -> Decimal {
        self.incoming - self.outgoing
    }
}

/// Sums incoming and outgoing amounts over the cash table. Unparseable
/// cells contribute zero.
pub fn cash_flow_totals(transactions: &[CashTransaction]) -> CashFlowTotals {
    let mut totals = CashFlowTotals::default();
    for tx in transactions {
        if !tx.zahlungseingang.is_empty() {
            totals.incoming += parse_eur_decimal(&tx.zahlungseingang);
        }
        if !tx.zahlungsausgang.is_empty() {
            totals.outgoing += parse_eur_decimal(&tx.zahlungsausgang);
        }
    }
    totals
}

// MARK: tests

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::statement::model::CashTransaction;
    use crate::testlib::assert_vec_eq;

    use super::{
        cash_flow_totals, transaction_type_breakdown, TypeCount,
    };

    fn tx(typ: &str, eingang: &str, ausgang: &str) -> CashTransaction {
        CashTransaction {
            typ: typ.to_string(),
            zahlungseingang: eingang.to_string(),
            zahlungsausgang: ausgang.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_type_breakdown() {
        let txs = vec![
            tx("Kartenzahlung", "", "10,00"),
            tx("Handel", "", "500,00"),
            tx("Kartenzahlung", "", "25,00"),
            tx("", "5,00", ""),
        ];
        let breakdown = transaction_type_breakdown(&txs);
        assert_vec_eq(
            breakdown,
            vec![
                TypeCount { typ: "Kartenzahlung".to_string(), count: 2 },
                TypeCount { typ: "Andere".to_string(), count: 1 },
                TypeCount { typ: "Handel".to_string(), count: 1 },
            ],
        );
    }

    #[test]
    fn test_cash_flow_totals() {
        let txs = vec![
            tx("A", "1.000,00", ""),
            tx("B", "", "250,50"),
            tx("C", "10,00", "5,00"),
            tx("D", "kaputt", ""),
        ];
        let totals = cash_flow_totals(&txs);
        assert_eq!(totals.incoming, dec!(1010));
        assert_eq!(totals.outgoing, dec!(255.50));
        assert_eq!(totals.net(), dec!(754.50));
    }
}
