use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use time::Date;

use crate::statement::fragment::TextFragment;
use crate::util::date::parse_dotted_date;
use crate::util::decimal::{parse_eur_decimal_opt, round_cents};

use super::pnl::{PnlSummary, Position};

lazy_static! {
    /// A position block opens with its quantity line, like
    /// "10,000000 Stk." or "1.000 Nominale".
    static ref QTY_LINE_RE: Regex =
        Regex::new(r"(?i)^\s*([\d.]+,\d{2,6}|\d+)\s*(Stk\.?|Nominale)\b").unwrap();

    /// Line tail without a price date: "<price> <total>".
    static ref TAIL_RE: Regex = Regex::new(
        r"(\d{1,3}(?:[\.,]\d{3})*,\d{2})\s+(\d{1,3}(?:[\.,]\d{3})*,\d{2})\s*$"
    )
    .unwrap();

    /// Line tail with a price date: "<price> <dd.mm.yyyy> <total>".
    static ref TAIL_WITH_DATE_RE: Regex = Regex::new(
        r"(\d{1,3}(?:[\.,]\d{3})*,\d{2})\s*(\d{2}\.\d{2}\.\d{4})\s*(\d{1,3}(?:[\.,]\d{3})*,\d{2})\s*$"
    )
    .unwrap();

    static ref ISIN_RE: Regex =
        Regex::new(r"\bISIN:\s*([A-Z]{2}[A-Z0-9]{10})\b").unwrap();

    static ref CUSTODY_COUNTRY_RE: Regex =
        Regex::new(r"(?i)^Lagerland\s*:").unwrap();

    /// Template boilerplate that must not be glued onto instrument names.
    static ref SKIP_LINE_RE: Regex = Regex::new(
        r"(?i)(POSITIONEN|STK\.?\s*/\s*NOMINALE|KURS PRO ST[ÜU]CK|KURSWERT IN EUR|DEPOTAUSZUG|SEITE)"
    )
    .unwrap();
}

/// One instrument held in the depot (custody account) statement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepotHolding {
    pub quantity: Option<Decimal>,
    pub unit: String,
    pub name: String,
    pub name_extra: String,
    pub isin: String,
    pub price_per_unit: Option<Decimal>,
    pub price_date: Option<Date>,
    pub market_value_eur: Option<Decimal>,
    pub custody_country: String,
    /// quantity * price, rounded to cents; a cross-check against the
    /// statement's own market value column.
    pub computed_value: Option<Decimal>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepotParseOptions {
    /// Price date assumed for rows whose tail carries none. The statement
    /// usually prints its own valuation date once; pass that here.
    pub fallback_price_date: Option<Date>,
}

/// Vertical rounding granularity for grouping fragments into text lines.
const LINE_EPS: f64 = 1.0;

/// Flattens one page of fragments into text lines, top-to-bottom, each line
/// joined left-to-right.
fn group_lines(items: &[TextFragment]) -> Vec<String> {
    let mut keyed: Vec<(i64, &TextFragment)> = items
        .iter()
        .filter(|it| !it.trimmed().is_empty())
        .map(|it| (((it.y / LINE_EPS).round() as i64), it))
        .collect();
    // Reading order: descending y, then ascending x within a line.
    keyed.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.x.total_cmp(&b.1.x)));

    let mut lines: Vec<String> = Vec::new();
    let mut last_key: Option<i64> = None;
    for (key, it) in keyed {
        if last_key == Some(key) {
            let line = lines.last_mut().unwrap();
            line.push(' ');
            line.push_str(it.trimmed());
        } else {
            lines.push(it.trimmed().to_string());
            last_key = Some(key);
        }
    }
    lines
}

/// Parses a depot statement's pages into holdings.
///
/// A quantity line opens a record; the price/total tail is split off its
/// end. Later lines contribute the ISIN, the custody country, and short
/// continuation lines of the instrument name, until the next quantity line.
pub fn parse_depot_pages(
    pages: &[Vec<TextFragment>],
    options: &DepotParseOptions,
) -> Vec<DepotHolding> {
    let mut holdings: Vec<DepotHolding> = Vec::new();

    let all_lines: Vec<String> =
        pages.iter().flat_map(|pg| group_lines(pg)).collect();
    tracing::debug!("depot statement: {} text lines", all_lines.len());

    for line in &all_lines {
        if let Some(m) = QTY_LINE_RE.captures(line) {
            let qty_str = m.get(1).unwrap().as_str();
            let unit = m.get(2).unwrap().as_str();

            let mut price = None;
            let mut price_date = None;
            let mut total = None;
            let mut name_part = line.as_str();

            if let Some(t) = TAIL_WITH_DATE_RE.captures(line) {
                price = parse_eur_decimal_opt(t.get(1).unwrap().as_str());
                price_date =
                    parse_dotted_date(t.get(2).unwrap().as_str()).ok();
                total = parse_eur_decimal_opt(t.get(3).unwrap().as_str());
                name_part = &line[..t.get(0).unwrap().start()];
            } else if let Some(t) = TAIL_RE.captures(line) {
                price = parse_eur_decimal_opt(t.get(1).unwrap().as_str());
                price_date = options.fallback_price_date;
                total = parse_eur_decimal_opt(t.get(2).unwrap().as_str());
                name_part = &line[..t.get(0).unwrap().start()];
            } else {
                tracing::trace!("no price tail on quantity line: {line:?}");
            }

            let name = QTY_LINE_RE
                .replace(name_part, "")
                .trim_start_matches(['.', ' '])
                .trim()
                .to_string();

            holdings.push(DepotHolding {
                quantity: parse_eur_decimal_opt(qty_str),
                unit: if unit.to_lowercase().starts_with("stk") {
                    "Stk".to_string()
                } else {
                    unit.to_string()
                },
                name,
                price_per_unit: price,
                price_date,
                market_value_eur: total,
                ..Default::default()
            });
            continue;
        }

        // Detail lines attach to the most recent record.
        let last = match holdings.last_mut() {
            Some(l) => l,
            None => continue,
        };

        if let Some(m) = ISIN_RE.captures(line) {
            last.isin = m.get(1).unwrap().as_str().to_string();
            continue;
        }

        if CUSTODY_COUNTRY_RE.is_match(line) {
            if let Some((_, rest)) = line.split_once(':') {
                last.custody_country = rest.trim().to_string();
            }
            continue;
        }

        if !SKIP_LINE_RE.is_match(line)
            && line.chars().count() <= 80
            && !ISIN_RE.is_match(line)
        {
            if last.name_extra.is_empty() {
                last.name_extra = line.clone();
            } else {
                last.name_extra.push(' ');
                last.name_extra.push_str(line);
            }
        }
    }

    for h in &mut holdings {
        h.computed_value = match (h.quantity, h.price_per_unit) {
            (Some(q), Some(p)) => Some(round_cents(&(q * p))),
            _ => None,
        };
    }

    tracing::info!("parsed {} depot holdings", holdings.len());
    holdings
}

/// An open position valued against current depot holdings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepotValuation {
    pub current_value: Decimal,
    pub current_price: Option<Decimal>,
    pub current_quantity: Option<Decimal>,
    pub price_date: Option<Date>,
    pub unrealized_pnl: Decimal,
    /// Percent of cost basis; zero when there is no cost basis.
    pub unrealized_pnl_pct: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrichedPosition {
    pub position: Position,
    /// Present for open positions matched by ISIN in the depot.
    pub valuation: Option<DepotValuation>,
    /// Realized plus unrealized gains.
    pub total_pnl: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnrichedPnl {
    pub positions: Vec<EnrichedPosition>,
    /// Current value where known, cost basis otherwise.
    pub total_current_value: Decimal,
    pub total_unrealized_pnl: Decimal,
    pub total_pnl: Decimal,
    pub valuation_date: Option<Date>,
}

/// Marries the trading P&L summary with current depot holdings, by ISIN.
/// Only open positions take a valuation; everything else keeps its
/// realized-only figures.
pub fn enrich_with_depot(
    pnl: &PnlSummary,
    holdings: &[DepotHolding],
) -> EnrichedPnl {
    let by_isin: std::collections::HashMap<&str, &DepotHolding> = holdings
        .iter()
        .filter(|h| !h.isin.is_empty())
        .map(|h| (h.isin.as_str(), h))
        .collect();

    let mut enriched = EnrichedPnl {
        valuation_date: holdings.iter().find_map(|h| h.price_date),
        ..Default::default()
    };

    for pos in &pnl.positions {
        let holding = by_isin.get(pos.isin.as_str());
        let ep = match holding {
            Some(h) if pos.is_open() => {
                let current_value =
                    h.market_value_eur.unwrap_or(Decimal::ZERO);
                let unrealized = current_value - pos.cost_basis;
                let pct = if pos.cost_basis > Decimal::ZERO {
                    unrealized / pos.cost_basis * Decimal::ONE_HUNDRED
                } else {
                    Decimal::ZERO
                };
                EnrichedPosition {
                    total_pnl: pos.realized_gain_loss + unrealized,
                    valuation: Some(DepotValuation {
                        current_value,
                        current_price: h.price_per_unit,
                        current_quantity: h.quantity,
                        price_date: h.price_date,
                        unrealized_pnl: unrealized,
                        unrealized_pnl_pct: pct,
                    }),
                    position: pos.clone(),
                }
            }
            _ => EnrichedPosition {
                total_pnl: pos.realized_gain_loss,
                valuation: None,
                position: pos.clone(),
            },
        };

        enriched.total_current_value += match &ep.valuation {
            Some(v) => v.current_value,
            None => ep.position.cost_basis,
        };
        enriched.total_unrealized_pnl += ep
            .valuation
            .as_ref()
            .map(|v| v.unrealized_pnl)
            .unwrap_or(Decimal::ZERO);
        enriched.positions.push(ep);
    }

    enriched.total_pnl = pnl.total_realized + enriched.total_unrealized_pnl;
    enriched
}

// MARK: tests
