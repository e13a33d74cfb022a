use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::json;

use crate::app::outfmt::csv::CsvWriter;
use crate::app::outfmt::model::TableWriter;
use crate::app::outfmt::text::TextWriter;
use crate::render::RenderTable;
use crate::statement::fragment::TextFragment;
use crate::statement::model::{InterestTransaction, StatementTransactions};
use crate::statement::parse::{
    parse_statement, ExtractedPages, ParseObserver, ParseOptions,
    DEFAULT_FOOTER_BAND,
};
use crate::statement::sanity::{check_balance_continuity, SanityCheckResult};
use crate::statement::stats::{cash_flow_totals, transaction_type_breakdown};
use crate::trading::depot::{
    enrich_with_depot, parse_depot_pages, DepotHolding, DepotParseOptions,
    EnrichedPnl,
};
use crate::trading::pnl::{compute_pnl, PnlSummary};
use crate::trading::trade::{trading_transactions, TradingTransaction};
use crate::util::basic::SError;
use crate::util::date::{parse_dotted_date, to_dotted_string};
use crate::util::decimal::format_eur;
use crate::util::rw::WriteHandle;
use crate::write_errln;

/// Extracts cash and money-market transactions from bank/broker statement
/// PDFs and derives trading P&L per instrument.
///
/// Statements may be German, Italian or English; tables continuing across
/// pages are stitched back together. Output is CSV by default (semicolon
/// separated); use --pretty for terminal tables, or --xlsx/--json-dir for
/// file exports.
///
/// Inputs can also be .json fragment dumps produced by pdf-fragments,
/// which is mostly useful for testing and for re-running a parse without
/// the original PDF.
#[derive(Parser, Debug)]
#[command(author, about, long_about)]
pub struct Args {
    /// Statement PDFs (or .json fragment dumps)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print pretty tables instead of CSV
    #[arg(short = 'p', long)]
    pub pretty: bool,

    /// Write each table as <name>.csv into this directory
    #[arg(long)]
    pub csv_dir: Option<String>,

    /// Write all tables into this XLSX workbook
    #[cfg(feature = "xlsx_write")]
    #[arg(long)]
    pub xlsx: Option<String>,

    /// Write each table as <name>.json into this directory
    #[arg(long)]
    pub json_dir: Option<String>,

    /// Depot (custody account) statement used to value open positions
    #[arg(long)]
    pub depot: Option<PathBuf>,

    /// Price date (dd.mm.yyyy) assumed for depot rows without one
    #[arg(long)]
    pub depot_price_date: Option<String>,

    /// Points from the page bottom to drop as repeating footer.
    /// Calibrate per statement template.
    #[arg(long, default_value_t = DEFAULT_FOOTER_BAND)]
    pub footer_band: f64,

    /// Dump the extracted tables only; skip trading reconstruction
    #[arg(long)]
    pub extract_only: bool,

    /// Turn on debug tracing for this crate
    ///
    /// Equivalent to TRACE=auszug=debug.
    #[arg(long)]
    pub debug: bool,
}

struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn on_status(&mut self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn on_progress(&mut self, current: u32, total: u32) {
        tracing::debug!("page {current}/{total} done");
    }
}

/// Loads a file's pages of positioned fragments. JSON fragment dumps are
/// read directly; everything else goes through the PDF extractor.
fn load_pages(path: &Path) -> Result<Vec<Vec<TextFragment>>, SError> {
    if path.extension().unwrap_or_default().to_string_lossy() == "json" {
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {path:?}: {e}"))?;
        return serde_json::from_str(&data)
            .map_err(|e| format!("Failed to parse fragments in {path:?}: {e}"));
    }

    #[cfg(feature = "pdf_parse")]
    {
        crate::pdf::extract_fragments_from_path(path)
    }
    #[cfg(not(feature = "pdf_parse"))]
    {
        Err(format!(
            "{path:?}: PDF support was not built in (pdf_parse feature)"
        ))
    }
}

// MARK: table builders

fn sanity_label(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "FEHLER"
    }
}

pub fn cash_table(checked: &SanityCheckResult) -> RenderTable {
    let mut rt = RenderTable::with_header(&[
        "Datum",
        "Typ",
        "Beschreibung",
        "Zahlungseingang",
        "Zahlungsausgang",
        "Saldo",
        "Saldo-Check",
    ]);

    for c in &checked.transactions {
        rt.rows.push(vec![
            c.tx.datum.clone(),
            c.tx.typ.clone(),
            c.tx.beschreibung.clone(),
            c.tx.zahlungseingang.clone(),
            c.tx.zahlungsausgang.clone(),
            c.tx.saldo.clone(),
            sanity_label(c.sanity_ok).to_string(),
        ]);
    }

    let txs: Vec<_> =
        checked.transactions.iter().map(|c| c.tx.clone()).collect();
    let totals = cash_flow_totals(&txs);
    let s = String::from;
    rt.footer = vec![
        s(""),
        s(""),
        s("Summe"),
        format_eur(&totals.incoming),
        format_eur(&totals.outgoing),
        s(""),
        s(""),
    ];

    rt.notes.push(format!(
        "{} Transaktionen, Saldo-Veränderung {} €",
        checked.transactions.len(),
        format_eur(&totals.net())
    ));
    if checked.failed_checks > 0 {
        rt.notes.push(format!(
            "{} fehlgeschlagene Saldo-Prüfungen",
            checked.failed_checks
        ));
    }
    let breakdown = transaction_type_breakdown(&txs);
    if !breakdown.is_empty() {
        let parts: Vec<String> = breakdown
            .iter()
            .map(|tc| format!("{} ({})", tc.typ, tc.count))
            .collect();
        rt.notes.push(format!("Typen: {}", parts.join(", ")));
    }
    rt
}

pub fn interest_table(transactions: &[InterestTransaction]) -> RenderTable {
    let mut rt = RenderTable::with_header(&[
        "Datum",
        "Zahlungsart",
        "Geldmarktfonds",
        "Stück",
        "Kurs pro Stück",
        "Betrag",
    ]);
    for tx in transactions {
        rt.rows.push(vec![
            tx.datum.clone(),
            tx.zahlungsart.clone(),
            tx.geldmarktfonds.clone(),
            tx.stueck.clone(),
            tx.kurs.clone(),
            tx.betrag.clone(),
        ]);
    }
    rt.notes
        .push(format!("{} Geldmarktfonds-Transaktionen", transactions.len()));
    rt
}

pub fn trades_table(trades: &[TradingTransaction]) -> RenderTable {
    let mut rt = RenderTable::with_header(&[
        "Datum",
        "ISIN",
        "Wertpapier",
        "Aktion",
        "Betrag",
        "Order",
    ]);
    for t in trades {
        rt.rows.push(vec![
            t.date_text.clone(),
            t.isin.clone(),
            t.stock_name.clone(),
            t.action.label().to_string(),
            format_eur(&t.amount),
            t.trade_id.clone(),
        ]);
    }
    rt
}

fn pnl_summary_notes(pnl: &PnlSummary) -> Vec<String> {
    vec![
        format!("Aktuell investiert: {} €", format_eur(&pnl.total_invested)),
        format!(
            "Realisierte Gewinne/Verluste: {} €",
            format_eur(&pnl.total_realized)
        ),
        format!(
            "Netto-Cashflow: {} €",
            format_eur(&pnl.total_net_cash_flow)
        ),
        format!("Offene Positionen: {}", pnl.open_positions),
        format!("Geschlossene Positionen: {}", pnl.closed_positions),
        format!("Anzahl Trades: {}", pnl.total_trades),
        format!("Gesamtvolumen: {} €", format_eur(&pnl.total_volume)),
    ]
}

pub fn pnl_table(pnl: &PnlSummary) -> RenderTable {
    let mut rt = RenderTable::with_header(&[
        "ISIN",
        "Wertpapier",
        "Gekauft",
        "Verkauft",
        "Netto-Cashflow",
        "Realisiert",
        "Investiert",
        "Status",
        "Trades",
        "Erster Trade",
        "Letzter Trade",
    ]);
    for p in &pnl.positions {
        rt.rows.push(vec![
            p.isin.clone(),
            p.stock_name.clone(),
            format_eur(&p.total_bought),
            format_eur(&p.total_sold),
            format_eur(&p.net_cash_flow),
            format_eur(&p.realized_gain_loss),
            format_eur(&p.cost_basis),
            p.status.label().to_string(),
            p.total_transactions.to_string(),
            p.first_trade.clone(),
            p.last_trade.clone(),
        ]);
    }
    rt.notes = pnl_summary_notes(pnl);
    rt
}

pub fn enriched_pnl_table(
    pnl: &PnlSummary,
    enriched: &EnrichedPnl,
) -> RenderTable {
    let mut rt = RenderTable::with_header(&[
        "ISIN",
        "Wertpapier",
        "Gekauft",
        "Verkauft",
        "Realisiert",
        "Investiert",
        "Aktueller Wert",
        "Unrealisiert",
        "Gesamt-P&L",
        "Status",
        "Kursdatum",
    ]);
    for ep in &enriched.positions {
        let p = &ep.position;
        let (current, unrealized, price_date) = match &ep.valuation {
            Some(v) => (
                format_eur(&v.current_value),
                format_eur(&v.unrealized_pnl),
                v.price_date.map(|d| to_dotted_string(&d)).unwrap_or_default(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        rt.rows.push(vec![
            p.isin.clone(),
            p.stock_name.clone(),
            format_eur(&p.total_bought),
            format_eur(&p.total_sold),
            format_eur(&p.realized_gain_loss),
            format_eur(&p.cost_basis),
            current,
            unrealized,
            format_eur(&ep.total_pnl),
            p.status.label().to_string(),
            price_date,
        ]);
    }

    rt.notes = pnl_summary_notes(pnl);
    rt.notes.push(format!(
        "Unrealisierte Gewinne/Verluste: {} €",
        format_eur(&enriched.total_unrealized_pnl)
    ));
    rt.notes.push(format!(
        "Aktueller Portfolio-Wert: {} €",
        format_eur(&enriched.total_current_value)
    ));
    rt.notes
        .push(format!("Gesamt-P&L: {} €", format_eur(&enriched.total_pnl)));
    if let Some(d) = enriched.valuation_date {
        rt.notes.push(format!("Kursdatum: {}", to_dotted_string(&d)));
    }
    rt
}

pub fn depot_table(holdings: &[DepotHolding]) -> RenderTable {
    let mut rt = RenderTable::with_header(&[
        "Stück",
        "Einheit",
        "Wertpapier",
        "ISIN",
        "Kurs",
        "Kursdatum",
        "Kurswert",
        "Lagerland",
    ]);
    for h in holdings {
        let name = if h.name_extra.is_empty() {
            h.name.clone()
        } else {
            format!("{} {}", h.name, h.name_extra)
        };
        rt.rows.push(vec![
            h.quantity.map(|q| q.to_string()).unwrap_or_default(),
            h.unit.clone(),
            name,
            h.isin.clone(),
            h.price_per_unit.map(|p| format_eur(&p)).unwrap_or_default(),
            h.price_date.map(|d| to_dotted_string(&d)).unwrap_or_default(),
            h.market_value_eur.map(|v| format_eur(&v)).unwrap_or_default(),
            h.custody_country.clone(),
        ]);
    }
    rt
}

// MARK: output

/// JSON export: each table becomes an array of header-keyed objects.
fn table_to_json(table: &RenderTable) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = table
        .rows
        .iter()
        .map(|row| {
            let obj: serde_json::Map<String, serde_json::Value> = table
                .header
                .iter()
                .zip(row.iter())
                .map(|(h, cell)| (h.clone(), json!(cell)))
                .collect();
            serde_json::Value::Object(obj)
        })
        .collect();
    serde_json::Value::Array(rows)
}

fn write_json_tables(
    out_dir: &String,
    tables: &[(String, RenderTable)],
) -> Result<(), SError> {
    let dir_path = PathBuf::from(out_dir);
    crate::util::os::mk_writable_dir(&dir_path)
        .map_err(|e| format!("Failed to create {out_dir}: {e}"))?;
    for (name, table) in tables {
        let file_path = dir_path.join(format!("{name}.json"));
        let fp = std::fs::File::create(&file_path)
            .map_err(|e| format!("Failed to create {file_path:?}: {e}"))?;
        serde_json::to_writer_pretty(fp, &table_to_json(table))
            .map_err(|e| format!("Failed to write {file_path:?}: {e}"))?;
    }
    Ok(())
}

// MARK: run

pub fn run() -> Result<(), ()> {
    let args = Args::parse();
    run_with_args(
        args,
        WriteHandle::stdout_write_handle(),
        WriteHandle::stderr_write_handle(),
    )
}

pub fn run_with_args(
    mut args: Args,
    out_w: WriteHandle,
    mut err_w: WriteHandle,
) -> Result<(), ()> {
    if args.debug {
        crate::tracing::enable_trace_env("auszug=debug");
    }
    crate::tracing::setup_tracing();

    // Deterministic multi-file processing order.
    args.files.sort();

    let options = ParseOptions { footer_band: args.footer_band };

    let mut all = StatementTransactions::default();
    for fpath in &args.files {
        let pages = load_pages(fpath)
            .map_err(|e| write_errln!(err_w, "Error: {e}"))?;
        let mut source = ExtractedPages::new(pages);
        let parsed =
            parse_statement(&mut source, &options, &mut TracingObserver)
                .map_err(|e| {
                    write_errln!(err_w, "Error parsing {fpath:?}: {e}")
                })?;
        all.extend(parsed);
    }

    let checked = check_balance_continuity(&all.cash);
    if checked.failed_checks > 0 {
        write_errln!(
            err_w,
            "Warning: {} balance check(s) failed",
            checked.failed_checks
        );
    }

    let mut tables: Vec<(String, RenderTable)> = vec![
        ("cash".to_string(), cash_table(&checked)),
        ("interest".to_string(), interest_table(&all.interest)),
    ];

    if !args.extract_only {
        let trades = trading_transactions(&all.cash);
        let pnl = compute_pnl(&trades);
        tables.push(("trades".to_string(), trades_table(&trades)));

        if let Some(depot_path) = &args.depot {
            let fallback_price_date = match &args.depot_price_date {
                Some(d) => Some(parse_dotted_date(d).map_err(|e| {
                    write_errln!(
                        err_w,
                        "Error: invalid --depot-price-date {d:?}: {e}"
                    )
                })?),
                None => None,
            };
            let depot_pages = load_pages(depot_path)
                .map_err(|e| write_errln!(err_w, "Error: {e}"))?;
            let holdings = parse_depot_pages(
                &depot_pages,
                &DepotParseOptions { fallback_price_date },
            );
            let enriched = enrich_with_depot(&pnl, &holdings);
            tables
                .push(("pnl".to_string(), enriched_pnl_table(&pnl, &enriched)));
            tables.push(("depot".to_string(), depot_table(&holdings)));
        } else {
            tables.push(("pnl".to_string(), pnl_table(&pnl)));
        }
    }

    let mut printer: Box<dyn TableWriter> = if args.pretty {
        Box::new(TextWriter::new(out_w.clone()))
    } else if let Some(dir) = &args.csv_dir {
        Box::new(
            CsvWriter::new(dir)
                .map_err(|e| write_errln!(err_w, "Error: {e}"))?,
        )
    } else {
        Box::new(CsvWriter::new_to_writer(out_w.clone()))
    };
    for (name, table) in &tables {
        printer
            .print_render_table(name, table)
            .map_err(|e| write_errln!(err_w, "Error: {e}"))?;
    }
    printer.finish().map_err(|e| write_errln!(err_w, "Error: {e}"))?;

    #[cfg(feature = "xlsx_write")]
    if let Some(xlsx_path) = &args.xlsx {
        let mut xlsx_w: Box<dyn TableWriter> =
            Box::new(crate::app::outfmt::xlsx::XlsxWriter::new(xlsx_path));
        for (name, table) in &tables {
            xlsx_w
                .print_render_table(name, table)
                .map_err(|e| write_errln!(err_w, "Error: {e}"))?;
        }
        xlsx_w.finish().map_err(|e| write_errln!(err_w, "Error: {e}"))?;
    }

    if let Some(json_dir) = &args.json_dir {
        write_json_tables(json_dir, &tables)
            .map_err(|e| write_errln!(err_w, "Error: {e}"))?;
    }

    Ok(())
}

// MARK: tests
