use super::fragment::TextFragment;

/// Labels the statement templates use for the cash table header row, across
/// the three languages they are printed in.
const CASH_HEADER_KEYWORDS: &[&str] = &[
    "DATUM",
    "TYP",
    "BESCHREIBUNG",
    "ZAHLUNGSEINGANG",
    "ZAHLUNGSAUSGANG",
    "SALDO",
    // Italian
    "DATA",
    "TIPO",
    "DESCRIZIONE",
    "IN ENTRATA",
    "IN USCITA",
    // English
    "DATE",
    "TYPE",
    "DESCRIPTION",
    "MONEY",
    "IN",
    "OUT",
    "BALANCE",
];

const INTEREST_HEADER_KEYWORDS: &[&str] = &[
    "DATUM",
    "ZAHLUNGSART",
    "GELDMARKTFONDS",
    "STÜCK",
    "KURS PRO STÜCK",
    "BETRAG",
];

/// The resolved header row of the cash table. Each field holds the header
/// fragment whose x position anchors that column.
#[derive(Clone, Debug, PartialEq)]
pub struct CashHeaderSet {
    pub datum: TextFragment,
    pub typ: TextFragment,
    pub beschreibung: TextFragment,
    pub payments: PaymentHeaders,
    pub saldo: TextFragment,
}

/// Incoming/outgoing may be printed as two separate headers, or as a single
/// merged label spanning both columns. A merged header is split at its
/// horizontal midpoint when boundaries are derived.
#[derive(Clone, Debug, PartialEq)]
pub enum PaymentHeaders {
    Merged(TextFragment),
    Split { eingang: TextFragment, ausgang: TextFragment },
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterestHeaderSet {
    pub datum: TextFragment,
    pub zahlungsart: TextFragment,
    pub geldmarktfonds: TextFragment,
    pub stueck: TextFragment,
    pub kurs: TextFragment,
    pub betrag: TextFragment,
}

fn is_all_upper(s: &str) -> bool {
    s == s.to_uppercase()
}

/// Header candidates are upper-case fragments of more than two characters
/// containing one of the known keywords.
fn header_candidates<'a>(
    items: &'a [TextFragment],
    keywords: &[&str],
) -> Vec<&'a TextFragment> {
    items
        .iter()
        .filter(|it| {
            let t = it.trimmed();
            t.chars().count() > 2
                && is_all_upper(t)
                && keywords.iter().any(|kw| t.contains(kw))
        })
        .collect()
}

fn match_any<'a>(
    candidates: &[&'a TextFragment],
    labels: &[&str],
) -> Option<&'a TextFragment> {
    candidates.iter().find(|c| labels.contains(&c.trimmed())).copied()
}

/// Finds a header that the extractor split into two adjacent fragments
/// (like "MONEY" + "IN"): same line within 2 points, second fragment within
/// 100 x-units to the right. Synthesizes a single virtual fragment spanning
/// both.
///
/// This searches the raw fragments, not the keyword candidates: the second
/// word ("IN", "OUT") is too short to survive the candidate length filter.
fn find_composite(
    items: &[TextFragment],
    first: &str,
    second: &str,
) -> Option<TextFragment> {
    let joined = format!("{first} {second}");
    let fused = format!("{first}{second}");
    if let Some(single) = items.iter().find(|c| {
        let t = c.trimmed();
        t == joined || t == fused
    }) {
        return Some(single.clone());
    }

    for f in items.iter().filter(|c| c.trimmed() == first) {
        let nearby = items.iter().find(|c| {
            c.trimmed() == second
                && (c.y - f.y).abs() < 2.0
                && c.x > f.x
                && c.x < f.x + 100.0
        });
        if let Some(n) = nearby {
            return Some(TextFragment {
                text: joined,
                x: f.x,
                y: f.y,
                width: n.x + n.width - f.x,
                height: f.height.max(n.height),
            });
        }
    }
    None
}

fn is_merged_payments_label(text: &str) -> bool {
    (text.contains("ZAHLUNGSEINGANG") && text.contains("ZAHLUNGSAUSGANG"))
        || (text.contains("IN ENTRATA") && text.contains("IN USCITA"))
        || (text.contains("MONEY IN") && text.contains("MONEY OUT"))
}

/// Locates the cash table header row among a page's (section-cropped)
/// fragments. Returns None if any required slot is unresolved, which means
/// "no header on this page", not an error.
pub fn find_cash_headers(items: &[TextFragment]) -> Option<CashHeaderSet> {
    let candidates = header_candidates(items, CASH_HEADER_KEYWORDS);
    tracing::trace!(
        "cash header candidates: {:?}",
        candidates.iter().map(|c| c.trimmed()).collect::<Vec<_>>()
    );

    let datum = match_any(&candidates, &["DATUM", "DATA", "DATE"])?.clone();
    let typ = match_any(&candidates, &["TYP", "TIPO", "TYPE"])?.clone();
    let beschreibung =
        match_any(&candidates, &["BESCHREIBUNG", "DESCRIZIONE", "DESCRIPTION"])?
            .clone();
    let saldo = match_any(&candidates, &["SALDO", "BALANCE"])?.clone();

    let merged =
        candidates.iter().find(|c| is_merged_payments_label(c.trimmed()));
    let payments = match merged {
        Some(m) => PaymentHeaders::Merged((*m).clone()),
        None => {
            let eingang = match_any(&candidates, &["ZAHLUNGSEINGANG", "IN ENTRATA"])
                .cloned()
                .or_else(|| find_composite(items, "MONEY", "IN"))?;
            let ausgang = match_any(&candidates, &["ZAHLUNGSAUSGANG", "IN USCITA"])
                .cloned()
                .or_else(|| find_composite(items, "MONEY", "OUT"))?;
            PaymentHeaders::Split { eingang, ausgang }
        }
    };

    Some(CashHeaderSet { datum, typ, beschreibung, payments, saldo })
}

/// Locates the money-market fund (interest) table header row.
/// All six slots are required.
pub fn find_interest_headers(items: &[TextFragment]) -> Option<InterestHeaderSet> {
    let candidates = header_candidates(items, INTEREST_HEADER_KEYWORDS);

    let exact = |label: &str| -> Option<TextFragment> {
        candidates.iter().find(|c| c.trimmed() == label).map(|c| (*c).clone())
    };

    Some(InterestHeaderSet {
        datum: exact("DATUM")?,
        zahlungsart: exact("ZAHLUNGSART")?,
        geldmarktfonds: exact("GELDMARKTFONDS")?,
        stueck: exact("STÜCK")?,
        kurs: exact("KURS PRO STÜCK")?,
        betrag: exact("BETRAG")?,
    })
}

// MARK: tests

#[cfg(test)]
mod tests {
    use crate::statement::fragment::TextFragment;

    use super::{find_cash_headers, find_interest_headers, PaymentHeaders};

    fn frag(text: &str, x: f64, y: f64) -> TextFragment {
        TextFragment::new(text, x, y, 10.0 * text.len() as f64 / 2.0, 10.0)
    }

    fn german_cash_header_row(y: f64) -> Vec<TextFragment> {
        vec![
            frag("DATUM", 40.0, y),
            frag("TYP", 120.0, y),
            frag("BESCHREIBUNG", 180.0, y),
            frag("ZAHLUNGSEINGANG", 330.0, y),
            frag("ZAHLUNGSAUSGANG", 430.0, y),
            frag("SALDO", 530.0, y),
        ]
    }

    #[test]
    fn test_find_cash_headers_german() {
        let headers = find_cash_headers(&german_cash_header_row(700.0)).unwrap();
        assert_eq!(headers.datum.trimmed(), "DATUM");
        assert_eq!(headers.saldo.x, 530.0);
        match headers.payments {
            PaymentHeaders::Split { eingang, ausgang } => {
                assert_eq!(eingang.x, 330.0);
                assert_eq!(ausgang.x, 430.0);
            }
            PaymentHeaders::Merged(_) => panic!("expected split headers"),
        }
    }

    #[test]
    fn test_find_cash_headers_requires_all_slots() {
        let mut items = german_cash_header_row(700.0);
        items.retain(|it| it.trimmed() != "SALDO");
        assert_eq!(find_cash_headers(&items), None);

        // Without either payment column the header is also incomplete.
        let mut items = german_cash_header_row(700.0);
        items.retain(|it| !it.trimmed().starts_with("ZAHLUNGS"));
        assert_eq!(find_cash_headers(&items), None);
    }

    #[test]
    fn test_find_cash_headers_ignores_lowercase_and_short() {
        let mut items = german_cash_header_row(700.0);
        items.retain(|it| it.trimmed() != "DATUM");
        // Neither of these may satisfy the DATUM slot.
        items.push(frag("Datum", 40.0, 700.0));
        items.push(frag("DA", 40.0, 700.0));
        assert_eq!(find_cash_headers(&items), None);
    }

    #[test]
    fn test_find_cash_headers_merged_payments() {
        let items = vec![
            frag("DATA", 40.0, 700.0),
            frag("TIPO", 120.0, 700.0),
            frag("DESCRIZIONE", 180.0, 700.0),
            frag("IN ENTRATA / IN USCITA", 330.0, 700.0),
            frag("SALDO", 530.0, 700.0),
        ];
        let headers = find_cash_headers(&items).unwrap();
        match headers.payments {
            PaymentHeaders::Merged(m) => {
                assert_eq!(m.trimmed(), "IN ENTRATA / IN USCITA");
            }
            PaymentHeaders::Split { .. } => panic!("expected merged header"),
        }
    }

    #[test]
    fn test_find_cash_headers_composite_english() {
        // "MONEY IN" and "MONEY OUT" split into word fragments on one line.
        let items = vec![
            frag("DATE", 40.0, 700.0),
            frag("TYPE", 120.0, 700.0),
            frag("DESCRIPTION", 180.0, 700.0),
            frag("MONEY", 330.0, 700.0),
            frag("IN", 370.0, 700.5),
            frag("MONEY", 430.0, 700.0),
            frag("OUT", 470.0, 699.5),
            frag("BALANCE", 530.0, 700.0),
        ];
        let headers = find_cash_headers(&items).unwrap();
        match headers.payments {
            PaymentHeaders::Split { eingang, ausgang } => {
                assert_eq!(eingang.text, "MONEY IN");
                assert_eq!(eingang.x, 330.0);
                assert_eq!(ausgang.text, "MONEY OUT");
                assert_eq!(ausgang.x, 430.0);
                // Spans from the first word to the end of the second
                assert!(eingang.width > 40.0);
            }
            PaymentHeaders::Merged(_) => panic!("expected split headers"),
        }
    }

    #[test]
    fn test_find_interest_headers() {
        let items = vec![
            frag("DATUM", 40.0, 650.0),
            frag("ZAHLUNGSART", 120.0, 650.0),
            frag("GELDMARKTFONDS", 220.0, 650.0),
            frag("STÜCK", 360.0, 650.0),
            frag("KURS PRO STÜCK", 430.0, 650.0),
            frag("BETRAG", 530.0, 650.0),
        ];
        let headers = find_interest_headers(&items).unwrap();
        assert_eq!(headers.geldmarktfonds.x, 220.0);

        // All six slots are required.
        let mut missing = items.clone();
        missing.retain(|it| it.trimmed() != "BETRAG");
        assert_eq!(find_interest_headers(&missing), None);
    }
}
