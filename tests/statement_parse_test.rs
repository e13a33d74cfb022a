use auszug::statement::parse::{
    parse_statement, ExtractedPages, NoopObserver, ParseOptions,
};
use auszug::statement::sanity::check_balance_continuity;
use auszug::trading::pnl::{compute_pnl, PositionStatus};
use auszug::trading::trade::{trading_transactions, TradeAction};
use auszug::testlib::assert_vec_eq;
use rust_decimal_macros::dec;

mod common;
use common::{cash_header_page, cash_row, frag};

fn parse_pages(
    pages: Vec<Vec<auszug::statement::fragment::TextFragment>>,
) -> auszug::statement::model::StatementTransactions {
    let mut source = ExtractedPages::new(pages);
    parse_statement(&mut source, &ParseOptions::default(), &mut NoopObserver)
        .unwrap()
}

// Scenario: a single page with a German header row and one content row.
#[test]
fn test_single_page_cash_extraction() {
    let mut page = cash_header_page();
    page.extend(cash_row(
        650.0,
        "01 Jan. 2024",
        "Gutschrift",
        "Test",
        Some("100,00"),
        None,
        "100,00",
    ));

    let res = parse_pages(vec![page]);
    assert_eq!(res.cash.len(), 1);
    let tx = &res.cash[0];
    assert_eq!(tx.datum, "01 Jan. 2024");
    assert_eq!(tx.typ, "Gutschrift");
    assert_eq!(tx.beschreibung, "Test");
    assert_eq!(tx.zahlungseingang, "100,00");
    assert_eq!(tx.zahlungsausgang, "");
    // The rightmost numeric fragment is the balance.
    assert_eq!(tx.saldo, "100,00");
    assert!(res.interest.is_empty());
}

// Scenario: the header appears only on page 1; page 2 has content rows
// only. Both pages' rows appear, in page order, using page 1's boundaries.
#[test]
fn test_header_only_on_first_page() {
    let mut page1 = cash_header_page();
    page1.extend(cash_row(
        650.0,
        "01 Jan. 2024",
        "Gutschrift",
        "Einzahlung",
        Some("1.000,00"),
        None,
        "1.000,00",
    ));
    let mut page2 = cash_row(
        650.0,
        "02 Jan. 2024",
        "Kartenzahlung",
        "REWE Berlin",
        None,
        Some("100,00"),
        "900,00",
    );
    page2.extend(cash_row(
        600.0,
        "03 Jan. 2024",
        "Kartenzahlung",
        "BVG Ticket",
        None,
        Some("3,50"),
        "896,50",
    ));

    let res = parse_pages(vec![page1, page2]);
    let daten: Vec<&str> =
        res.cash.iter().map(|tx| tx.datum.as_str()).collect();
    assert_eq!(daten, vec!["01 Jan. 2024", "02 Jan. 2024", "03 Jan. 2024"]);
    assert_eq!(res.cash[2].zahlungsausgang, "3,50");
    assert_eq!(res.cash[2].saldo, "896,50");

    // The whole sequence passes the balance continuity check.
    let checked = check_balance_continuity(&res.cash);
    assert_eq!(checked.failed_checks, 0);
    let flags: Vec<bool> =
        checked.transactions.iter().map(|c| c.sanity_ok).collect();
    assert_vec_eq(flags, vec![true, true, true]);
}

// Scenario: a trade row flows from the cash table into one
// TradingTransaction with the right direction and amount.
#[test]
fn test_trade_reconstruction_end_to_end() {
    let mut page = cash_header_page();
    page.extend(cash_row(
        650.0,
        "04 März 2021",
        "Handel",
        "Ausführung Handel Direktkauf Kauf DE0001234567 EXAMPLE AG 987654",
        None,
        Some("500,00"),
        "500,00",
    ));
    // A non-trade row that must be silently ignored by the reconstructor
    page.extend(cash_row(
        600.0,
        "05 März 2021",
        "Kartenzahlung",
        "REWE",
        None,
        Some("20,00"),
        "480,00",
    ));

    let res = parse_pages(vec![page]);
    assert_eq!(res.cash.len(), 2);

    let trades = trading_transactions(&res.cash);
    assert_eq!(trades.len(), 1);
    let t = &trades[0];
    assert_eq!(t.isin, "DE0001234567");
    assert_eq!(t.stock_name, "EXAMPLE AG");
    assert_eq!(t.action, TradeAction::Kauf);
    assert!(t.action.is_buy());
    assert_eq!(t.amount, dec!(500));
    assert_eq!(t.trade_id, "987654");
}

// One buy of 500 and one sell of 600 close the position with 100 realized.
#[test]
fn test_trading_aggregation_end_to_end() {
    let mut page = cash_header_page();
    page.extend(cash_row(
        650.0,
        "04 März 2021",
        "Handel",
        "Ausführung Handel Direktkauf Kauf DE0001234567 EXAMPLE AG 11",
        None,
        Some("500,00"),
        "500,00",
    ));
    page.extend(cash_row(
        600.0,
        "10 Juni 2021",
        "Handel",
        "Ausführung Handel Direktverkauf Verkauf DE0001234567 EXAMPLE AG 12",
        Some("600,00"),
        None,
        "1.100,00",
    ));

    let res = parse_pages(vec![page]);
    let pnl = compute_pnl(&trading_transactions(&res.cash));
    assert_eq!(pnl.positions.len(), 1);
    let p = &pnl.positions[0];
    assert_eq!(p.status, PositionStatus::Closed);
    assert_eq!(p.realized_gain_loss, dec!(100));
    assert_eq!(p.cost_basis, dec!(0));
    assert_eq!(pnl.total_realized, dec!(100));
    assert_eq!(pnl.total_volume, dec!(1100));
}

// The cash section opens and closes; content below the end marker (here, a
// summary block) must not leak into the table.
#[test]
fn test_section_markers_crop_page() {
    let mut page = cash_header_page();
    page.extend(cash_row(
        650.0,
        "01 Jan. 2024",
        "Gutschrift",
        "Test",
        Some("100,00"),
        None,
        "100,00",
    ));
    page.push(frag("BARMITTELÜBERSICHT", 40.0, 500.0));
    // Below the end marker; would otherwise cluster as a row.
    page.extend(cash_row(
        450.0,
        "Gesamtsaldo",
        "",
        "",
        None,
        None,
        "100,00",
    ));
    // A second page after the section closed contributes nothing.
    let page2 = cash_row(
        650.0,
        "02 Jan. 2024",
        "Kartenzahlung",
        "REWE",
        None,
        Some("1,00"),
        "99,00",
    );

    let res = parse_pages(vec![page, page2]);
    assert_eq!(res.cash.len(), 1);
    assert_eq!(res.cash[0].datum, "01 Jan. 2024");
}

// Interest section: its own markers, header and row shape.
#[test]
fn test_interest_extraction() {
    let page = vec![
        frag("TRANSAKTIONSÜBERSICHT", 40.0, 760.0),
        frag("DATUM", 40.0, 700.0),
        frag("ZAHLUNGSART", 120.0, 700.0),
        frag("GELDMARKTFONDS", 220.0, 700.0),
        frag("STÜCK", 360.0, 700.0),
        frag("KURS PRO STÜCK", 430.0, 700.0),
        frag("BETRAG", 530.0, 700.0),
        frag("15 Feb. 2024", 40.0, 650.0),
        frag("Zinszahlung", 120.0, 650.0),
        frag("XEON Fonds", 220.0, 650.0),
        frag("0,412", 380.0, 650.0),
        frag("99,23", 460.0, 650.0),
        frag("40,88", 560.0, 650.0),
    ];

    let res = parse_pages(vec![page]);
    assert!(res.cash.is_empty());
    assert_eq!(res.interest.len(), 1);
    let tx = &res.interest[0];
    assert_eq!(tx.datum, "15 Feb. 2024");
    assert_eq!(tx.zahlungsart, "Zinszahlung");
    assert_eq!(tx.geldmarktfonds, "XEON Fonds");
    assert_eq!(tx.stueck, "0,412");
    assert_eq!(tx.kurs, "99,23");
    assert_eq!(tx.betrag, "40,88");
}

// Both sections on one document, separated by their markers; each table
// keeps its own boundaries and rows.
#[test]
fn test_cash_and_interest_sections_coexist() {
    let mut page1 = cash_header_page();
    page1.extend(cash_row(
        650.0,
        "01 Jan. 2024",
        "Gutschrift",
        "Test",
        Some("100,00"),
        None,
        "100,00",
    ));
    page1.push(frag("BARMITTELÜBERSICHT", 40.0, 550.0));

    let page2 = vec![
        frag("TRANSAKTIONSÜBERSICHT", 40.0, 760.0),
        frag("DATUM", 40.0, 700.0),
        frag("ZAHLUNGSART", 120.0, 700.0),
        frag("GELDMARKTFONDS", 220.0, 700.0),
        frag("STÜCK", 360.0, 700.0),
        frag("KURS PRO STÜCK", 430.0, 700.0),
        frag("BETRAG", 530.0, 700.0),
        frag("15 Feb. 2024", 40.0, 650.0),
        frag("Zinszahlung", 120.0, 650.0),
        frag("XEON Fonds", 220.0, 650.0),
        frag("0,412", 380.0, 650.0),
        frag("99,23", 460.0, 650.0),
        frag("40,88", 560.0, 650.0),
        frag("HINWEISE ZUM KONTOAUSZUG", 40.0, 400.0),
    ];

    let res = parse_pages(vec![page1, page2]);
    assert_eq!(res.cash.len(), 1);
    assert_eq!(res.interest.len(), 1);
}
