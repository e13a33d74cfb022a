use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use time::Date;

use crate::statement::model::CashTransaction;
use crate::util::date::parse_statement_date;
use crate::util::decimal::{is_positive, parse_eur_decimal};

/// The cash-table type cell marking a securities trade row.
pub const TRADE_TYPE_LABEL: &str = "Handel";

lazy_static! {
    /// Trade descriptions look like:
    /// "Ausführung Handel Direktkauf Kauf DE0001234567 EXAMPLE AG 987654"
    /// capturing the direction, the 12-character ISIN, the instrument name
    /// and the trailing numeric order id.
    static ref TRADE_DESC_RE: Regex = Regex::new(
        r"Ausführung Handel Direkt(kauf|verkauf)\s+(Kauf|Verkauf)\s+([A-Z0-9]{12})\s+(.+?)\s+(\d+)$"
    )
    .unwrap();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TradeAction {
    Kauf,
    Verkauf,
}

impl TradeAction {
    pub fn is_buy(&self) -> bool {
        *self == TradeAction::Kauf
    }

    pub fn label(&self) -> &'static str {
        match self {
            TradeAction::Kauf => "Kauf",
            TradeAction::Verkauf => "Verkauf",
        }
    }
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A buy or sell derived from one cash transaction row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradingTransaction {
    pub date: Option<Date>,
    /// The raw date cell, kept for rendering and grouping metadata.
    pub date_text: String,
    pub isin: String,
    pub stock_name: String,
    pub action: TradeAction,
    pub amount: Decimal,
    pub trade_id: String,
    pub balance_text: String,
}

/// Reconstructs trade records from cash transactions.
///
/// Only rows typed as trades are considered; of those, only descriptions
/// matching the strict trade pattern yield records. Everything else is
/// silently skipped: most cash rows are not trades, and a non-matching
/// description is expected, not an error. Rows whose resolved amount
/// (outgoing for buys, incoming for sells) is zero or unparseable are
/// dropped as well.
///
/// The result is ordered by parsed date ascending; records with an
/// unparseable date sort first.
pub fn trading_transactions(
    cash: &[CashTransaction],
) -> Vec<TradingTransaction> {
    let mut trades = Vec::new();
    for tx in cash {
        if tx.typ != TRADE_TYPE_LABEL {
            continue;
        }
        let caps = match TRADE_DESC_RE.captures(&tx.beschreibung) {
            Some(c) => c,
            None => {
                tracing::trace!(
                    "trade row description did not match: {:?}",
                    tx.beschreibung
                );
                continue;
            }
        };

        let action = match caps.get(2).unwrap().as_str() {
            "Kauf" => TradeAction::Kauf,
            _ => TradeAction::Verkauf,
        };
        let amount = if action.is_buy() {
            parse_eur_decimal(&tx.zahlungsausgang)
        } else {
            parse_eur_decimal(&tx.zahlungseingang)
        };
        if !is_positive(&amount) {
            tracing::trace!(
                "dropping trade with no usable amount: {:?}",
                tx.beschreibung
            );
            continue;
        }

        trades.push(TradingTransaction {
            date: parse_statement_date(&tx.datum),
            date_text: tx.datum.clone(),
            isin: caps.get(3).unwrap().as_str().to_string(),
            stock_name: caps.get(4).unwrap().as_str().trim().to_string(),
            action,
            amount,
            trade_id: caps.get(5).unwrap().as_str().to_string(),
            balance_text: tx.saldo.clone(),
        });
    }

    trades.sort_by_key(|t| t.date.unwrap_or(Date::MIN));
    trades
}

// MARK: tests
