use std::collections::HashMap;

use rust_decimal::Decimal;

use super::trade::TradingTransaction;

/// Classification of a position's aggregate buy/sell totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionStatus {
    /// Bought, nothing sold yet.
    Open,
    /// Sold without any recorded purchase (e.g. acquired before the
    /// statement period).
    SoldUnknownPurchase,
    /// Sold some, still holding the rest.
    PartiallySold,
    /// Sold at least as much as was bought.
    Closed,
    /// Bought and sold exactly the same amount.
    Balanced,
}

impl PositionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PositionStatus::Open => "Offen (Holding)",
            PositionStatus::SoldUnknownPurchase => {
                "Verkauf (Unbekannter Einkauf)"
            }
            PositionStatus::PartiallySold => "Teilweise verkauft",
            PositionStatus::Closed => "Komplett verkauft",
            PositionStatus::Balanced => "Ausgeglichen",
        }
    }
}

/// Aggregated buy/sell activity for one instrument, with derived P&L.
/// Recomputed in full on each aggregation; never incrementally mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub isin: String,
    pub stock_name: String,
    pub total_bought: Decimal,
    pub total_sold: Decimal,
    /// Sells minus buys; negative means more money went in than came out.
    pub net_cash_flow: Decimal,
    /// Gains/losses actually realized by sales.
    pub realized_gain_loss: Decimal,
    /// Money still tied up in the position.
    pub cost_basis: Decimal,
    pub status: PositionStatus,
    pub num_buys: u32,
    pub num_sells: u32,
    pub total_transactions: u32,
    pub first_trade: String,
    pub last_trade: String,
}

impl Position {
    pub fn is_open(&self) -> bool {
        self.total_sold < self.total_bought
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PnlSummary {
    /// Sorted by descending absolute net cash flow: biggest positions first.
    pub positions: Vec<Position>,
    pub total_invested: Decimal,
    pub total_realized: Decimal,
    pub total_net_cash_flow: Decimal,
    pub total_trades: u32,
    pub total_volume: Decimal,
    pub open_positions: u32,
    pub closed_positions: u32,
}

struct PositionAccum {
    isin: String,
    stock_name: String,
    total_bought: Decimal,
    total_sold: Decimal,
    num_buys: u32,
    num_sells: u32,
    first_trade: String,
    last_trade: String,
}

/// Aggregates date-ordered trading transactions into per-instrument
/// positions and summary totals.
pub fn compute_pnl(transactions: &[TradingTransaction]) -> PnlSummary {
    // Group by ISIN, preserving first-seen order so that equal-sized
    // positions render in trade order.
    let mut accums: Vec<PositionAccum> = Vec::new();
    let mut accum_idx: HashMap<&str, usize> = HashMap::new();
    for tx in transactions {
        let idx = match accum_idx.get(tx.isin.as_str()) {
            Some(i) => *i,
            None => {
                accums.push(PositionAccum {
                    isin: tx.isin.clone(),
                    stock_name: tx.stock_name.clone(),
                    total_bought: Decimal::ZERO,
                    total_sold: Decimal::ZERO,
                    num_buys: 0,
                    num_sells: 0,
                    first_trade: tx.date_text.clone(),
                    last_trade: tx.date_text.clone(),
                });
                accum_idx.insert(&tx.isin, accums.len() - 1);
                accums.len() - 1
            }
        };
        let acc = &mut accums[idx];
        if tx.action.is_buy() {
            acc.total_bought += tx.amount;
            acc.num_buys += 1;
        } else {
            acc.total_sold += tx.amount;
            acc.num_sells += 1;
        }
        acc.last_trade = tx.date_text.clone();
    }

    let mut positions: Vec<Position> = accums
        .into_iter()
        .map(|acc| {
            let (status, cost_basis, realized_gain_loss) = classify(
                acc.total_bought,
                acc.total_sold,
            );
            Position {
                isin: acc.isin,
                stock_name: acc.stock_name,
                total_bought: acc.total_bought,
                total_sold: acc.total_sold,
                net_cash_flow: acc.total_sold - acc.total_bought,
                realized_gain_loss,
                cost_basis,
                status,
                num_buys: acc.num_buys,
                num_sells: acc.num_sells,
                total_transactions: acc.num_buys + acc.num_sells,
                first_trade: acc.first_trade,
                last_trade: acc.last_trade,
            }
        })
        .collect();

    positions
        .sort_by(|a, b| b.net_cash_flow.abs().cmp(&a.net_cash_flow.abs()));

    let total_invested: Decimal =
        positions.iter().map(|p| p.cost_basis).sum();
    let total_realized: Decimal =
        positions.iter().map(|p| p.realized_gain_loss).sum();
    let total_net_cash_flow: Decimal =
        positions.iter().map(|p| p.net_cash_flow).sum();
    let open_positions =
        positions.iter().filter(|p| p.is_open()).count() as u32;
    let closed_positions =
        positions.iter().filter(|p| !p.is_open()).count() as u32;

    PnlSummary {
        total_invested,
        total_realized,
        total_net_cash_flow,
        total_trades: transactions.len() as u32,
        total_volume: transactions.iter().map(|t| t.amount).sum(),
        open_positions,
        closed_positions,
        positions,
    }
}

/// The status/cost-basis/realized-gain classification over aggregate
/// totals. Without per-share quantities, money still in the position is
/// approximated as bought minus sold.
fn classify(
    bought: Decimal,
    sold: Decimal,
) -> (PositionStatus, Decimal, Decimal) {
    if bought > Decimal::ZERO && sold == Decimal::ZERO {
        (PositionStatus::Open, bought, Decimal::ZERO)
    } else if bought == Decimal::ZERO && sold > Decimal::ZERO {
        // No known cost: the whole proceeds count as realized.
        (PositionStatus::SoldUnknownPurchase, Decimal::ZERO, sold)
    } else if bought > sold {
        (PositionStatus::PartiallySold, bought - sold, Decimal::ZERO)
    } else if sold > bought {
        (PositionStatus::Closed, Decimal::ZERO, sold - bought)
    } else {
        (PositionStatus::Balanced, Decimal::ZERO, Decimal::ZERO)
    }
}

// MARK: tests

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::trading::trade::{TradeAction, TradingTransaction};
    use crate::util::date::parse_statement_date;

    use super::{compute_pnl, PositionStatus};

    fn tx(
        date_text: &str,
        isin: &str,
        action: TradeAction,
        amount: Decimal,
    ) -> TradingTransaction {
        TradingTransaction {
            date: parse_statement_date(date_text),
            date_text: date_text.to_string(),
            isin: isin.to_string(),
            stock_name: format!("{isin} AG"),
            action,
            amount,
            trade_id: "1".to_string(),
            balance_text: String::new(),
        }
    }

    #[test]
    fn test_closed_position_gains() {
        let summary = compute_pnl(&[
            tx("04 März 2021", "DE0001234567", TradeAction::Kauf, dec!(500)),
            tx("10 Juni 2021", "DE0001234567", TradeAction::Verkauf, dec!(600)),
        ]);
        assert_eq!(summary.positions.len(), 1);
        let p = &summary.positions[0];
        assert_eq!(p.status, PositionStatus::Closed);
        assert_eq!(p.realized_gain_loss, dec!(100));
        assert_eq!(p.cost_basis, dec!(0));
        assert_eq!(p.net_cash_flow, dec!(100));
        assert!(!p.is_open());
        assert_eq!(p.first_trade, "04 März 2021");
        assert_eq!(p.last_trade, "10 Juni 2021");

        assert_eq!(summary.total_invested, dec!(0));
        assert_eq!(summary.total_realized, dec!(100));
        assert_eq!(summary.total_volume, dec!(1100));
        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.open_positions, 0);
        assert_eq!(summary.closed_positions, 1);
    }

    #[test]
    fn test_open_holding() {
        let summary = compute_pnl(&[
            tx("04 März 2021", "DE0001234567", TradeAction::Kauf, dec!(500)),
            tx("05 März 2021", "DE0001234567", TradeAction::Kauf, dec!(250)),
        ]);
        let p = &summary.positions[0];
        assert_eq!(p.status, PositionStatus::Open);
        assert_eq!(p.cost_basis, dec!(750));
        assert_eq!(p.realized_gain_loss, dec!(0));
        assert_eq!(p.num_buys, 2);
        assert!(p.is_open());
        assert_eq!(summary.total_invested, dec!(750));
        assert_eq!(summary.open_positions, 1);
    }

    #[test]
    fn test_sell_without_purchase() {
        let summary = compute_pnl(&[tx(
            "04 März 2021",
            "US0987654321",
            TradeAction::Verkauf,
            dec!(300),
        )]);
        let p = &summary.positions[0];
        assert_eq!(p.status, PositionStatus::SoldUnknownPurchase);
        assert_eq!(p.realized_gain_loss, dec!(300));
        assert_eq!(p.cost_basis, dec!(0));
        assert!(!p.is_open());
    }

    #[test]
    fn test_partial_sale() {
        let summary = compute_pnl(&[
            tx("04 März 2021", "DE0001234567", TradeAction::Kauf, dec!(1000)),
            tx("10 Juni 2021", "DE0001234567", TradeAction::Verkauf, dec!(400)),
        ]);
        let p = &summary.positions[0];
        assert_eq!(p.status, PositionStatus::PartiallySold);
        assert_eq!(p.cost_basis, dec!(600));
        assert_eq!(p.realized_gain_loss, dec!(0));
        assert_eq!(p.net_cash_flow, dec!(-600));
        assert!(p.is_open());
    }

    #[test]
    fn test_balanced() {
        let summary = compute_pnl(&[
            tx("04 März 2021", "DE0001234567", TradeAction::Kauf, dec!(500)),
            tx("10 Juni 2021", "DE0001234567", TradeAction::Verkauf, dec!(500)),
        ]);
        let p = &summary.positions[0];
        assert_eq!(p.status, PositionStatus::Balanced);
        assert_eq!(p.cost_basis, dec!(0));
        assert_eq!(p.realized_gain_loss, dec!(0));
        assert!(!p.is_open());
    }

    #[test]
    fn test_sorted_by_abs_net_cash_flow() {
        let summary = compute_pnl(&[
            tx("04 März 2021", "DE0000000001", TradeAction::Kauf, dec!(100)),
            tx("04 März 2021", "DE0000000002", TradeAction::Kauf, dec!(5000)),
            tx("04 März 2021", "DE0000000003", TradeAction::Verkauf, dec!(900)),
        ]);
        let isins: Vec<&str> =
            summary.positions.iter().map(|p| p.isin.as_str()).collect();
        assert_eq!(
            isins,
            vec!["DE0000000002", "DE0000000003", "DE0000000001"]
        );
        assert_eq!(summary.total_net_cash_flow, dec!(-4200));
    }

    #[test]
    fn test_empty() {
        let summary = compute_pnl(&[]);
        assert!(summary.positions.is_empty());
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.total_volume, dec!(0));
    }
}
