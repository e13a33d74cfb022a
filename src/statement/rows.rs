use super::columns::{CashColumns, InterestColumns};
use super::fragment::TextFragment;
use super::model::{CashTransaction, InterestTransaction};

/// Content must sit strictly below the header row by at least this much to
/// count as table rows rather than header fringe.
const HEADER_CLEARANCE: f64 = 5.0;

/// Rows are split where the vertical gap between successive fragments
/// exceeds the average fragment height times this factor.
const ROW_GAP_FACTOR: f64 = 1.5;

/// Used when fragments carry no usable height information.
const FALLBACK_FRAGMENT_HEIGHT: f64 = 10.0;

/// Clusters a page's section fragments into table rows.
///
/// Fragments are first restricted to non-blank text below the header, then
/// sorted into reading order (top-to-bottom, left-to-right). A new row
/// starts wherever the y-gap between consecutive fragments exceeds the
/// dynamic gap threshold, so wrapped descriptions stay within their row.
pub fn cluster_rows(
    items: &[TextFragment],
    header_y: f64,
) -> Vec<Vec<TextFragment>> {
    let mut content: Vec<TextFragment> = items
        .iter()
        .filter(|it| {
            it.y < header_y - HEADER_CLEARANCE && !it.trimmed().is_empty()
        })
        .cloned()
        .collect();
    if content.is_empty() {
        return Vec::new();
    }

    content.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut avg_height =
        content.iter().map(|it| it.height).sum::<f64>() / content.len() as f64;
    if avg_height == 0.0 {
        avg_height = FALLBACK_FRAGMENT_HEIGHT;
    }
    let gap_threshold = avg_height * ROW_GAP_FACTOR;

    let mut rows = Vec::new();
    let mut current = vec![content[0].clone()];
    for i in 1..content.len() {
        if content[i - 1].y - content[i].y > gap_threshold {
            rows.push(std::mem::take(&mut current));
        }
        current.push(content[i].clone());
    }
    rows.push(current);
    rows
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn append(field: &mut String, text: &str) {
    field.push(' ');
    field.push_str(text);
}

/// Extracts cash transactions from a page's section fragments.
///
/// Within a row, fragments are assigned to fields by testing x against the
/// column boundaries left to right. The trailing money columns get special
/// treatment: everything right of the description column is collected,
/// sorted by x, and the rightmost fragment becomes the balance regardless
/// of its measured position. Money cells are right-aligned in the source
/// documents, so their left edges drift across the nominal boundaries; the
/// structural fact is that the last value on the row is the balance.
pub fn cash_rows(
    items: &[TextFragment],
    cols: &CashColumns,
) -> Vec<CashTransaction> {
    let mut transactions = Vec::new();
    for row in cluster_rows(items, cols.header_y) {
        let mut tx = CashTransaction::default();
        let mut money_items: Vec<&TextFragment> = Vec::new();
        for it in &row {
            if it.x < cols.datum.end {
                append(&mut tx.datum, &it.text);
            } else if it.x < cols.typ.end {
                append(&mut tx.typ, &it.text);
            } else if it.x < cols.beschreibung.end {
                append(&mut tx.beschreibung, &it.text);
            } else {
                money_items.push(it);
            }
        }

        money_items.sort_by(|a, b| a.x.total_cmp(&b.x));
        if let Some(last) = money_items.pop() {
            tx.saldo = last.text.clone();
        }
        for it in money_items {
            if it.x < cols.zahlungseingang.end {
                append(&mut tx.zahlungseingang, &it.text);
            } else if it.x < cols.zahlungsausgang.end {
                append(&mut tx.zahlungsausgang, &it.text);
            }
        }

        tx.datum = collapse_ws(&tx.datum);
        tx.typ = collapse_ws(&tx.typ);
        tx.beschreibung = collapse_ws(&tx.beschreibung);
        tx.zahlungseingang = collapse_ws(&tx.zahlungseingang);
        tx.zahlungsausgang = collapse_ws(&tx.zahlungsausgang);
        tx.saldo = collapse_ws(&tx.saldo);

        if !tx.is_empty() {
            transactions.push(tx);
        }
    }
    transactions
}

/// Interest-table counterpart of cash_rows. The amount column is the
/// rightmost fragment, popped the same way the cash balance is.
pub fn interest_rows(
    items: &[TextFragment],
    cols: &InterestColumns,
) -> Vec<InterestTransaction> {
    let mut transactions = Vec::new();
    for row in cluster_rows(items, cols.header_y) {
        let mut tx = InterestTransaction::default();
        let mut numeric_items: Vec<&TextFragment> = Vec::new();
        for it in &row {
            if it.x < cols.datum.end {
                append(&mut tx.datum, &it.text);
            } else if it.x < cols.zahlungsart.end {
                append(&mut tx.zahlungsart, &it.text);
            } else if it.x < cols.geldmarktfonds.end {
                append(&mut tx.geldmarktfonds, &it.text);
            } else {
                numeric_items.push(it);
            }
        }

        numeric_items.sort_by(|a, b| a.x.total_cmp(&b.x));
        if let Some(last) = numeric_items.pop() {
            tx.betrag = last.text.clone();
        }
        for it in numeric_items {
            if it.x < cols.stueck.end {
                append(&mut tx.stueck, &it.text);
            } else if it.x < cols.kurs.end {
                append(&mut tx.kurs, &it.text);
            }
        }

        tx.datum = collapse_ws(&tx.datum);
        tx.zahlungsart = collapse_ws(&tx.zahlungsart);
        tx.geldmarktfonds = collapse_ws(&tx.geldmarktfonds);
        tx.stueck = collapse_ws(&tx.stueck);
        tx.kurs = collapse_ws(&tx.kurs);
        tx.betrag = collapse_ws(&tx.betrag);

        if !tx.is_empty() {
            transactions.push(tx);
        }
    }
    transactions
}

// MARK: tests
