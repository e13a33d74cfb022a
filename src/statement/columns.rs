use super::headers::{CashHeaderSet, InterestHeaderSet, PaymentHeaders};

/// Margin subtracted from a header's x position when deriving the previous
/// column's right edge. Header text is typically indented slightly past the
/// column content it labels.
pub const COLUMN_MARGIN: f64 = 5.0;

/// A half-open x-interval [start, end) assigned to one output field.
/// The last column of a table is unbounded to the right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnBoundary {
    pub start: f64,
    pub end: f64,
}

/// Column boundaries of the cash table, with the y of the header row that
/// produced them. Once derived, these persist across pages until a new
/// header row is found; they are never reset by a header-less page.
#[derive(Clone, Debug, PartialEq)]
pub struct CashColumns {
    pub datum: ColumnBoundary,
    pub typ: ColumnBoundary,
    pub beschreibung: ColumnBoundary,
    pub zahlungseingang: ColumnBoundary,
    pub zahlungsausgang: ColumnBoundary,
    pub saldo: ColumnBoundary,
    pub header_y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterestColumns {
    pub datum: ColumnBoundary,
    pub zahlungsart: ColumnBoundary,
    pub geldmarktfonds: ColumnBoundary,
    pub stueck: ColumnBoundary,
    pub kurs: ColumnBoundary,
    pub betrag: ColumnBoundary,
    pub header_y: f64,
}

/// Derives cash column boundaries from a located header row. Pure: the same
/// header set always produces identical boundaries.
///
/// A merged incoming/outgoing header is split at its horizontal midpoint;
/// both sub-columns share the midpoint as their mutual boundary.
pub fn cash_column_boundaries(headers: &CashHeaderSet) -> CashColumns {
    let (payments_start, eingang_end, ausgang_start) = match &headers.payments {
        PaymentHeaders::Merged(m) => {
            let midpoint = m.x + m.width / 2.0;
            (m.x - COLUMN_MARGIN, midpoint, midpoint)
        }
        PaymentHeaders::Split { eingang, ausgang } => (
            eingang.x - COLUMN_MARGIN,
            ausgang.x - COLUMN_MARGIN,
            ausgang.x - COLUMN_MARGIN,
        ),
    };
    let saldo_start = headers.saldo.x - COLUMN_MARGIN;

    CashColumns {
        datum: ColumnBoundary { start: 0.0, end: headers.typ.x - COLUMN_MARGIN },
        typ: ColumnBoundary {
            start: headers.typ.x - COLUMN_MARGIN,
            end: headers.beschreibung.x - COLUMN_MARGIN,
        },
        beschreibung: ColumnBoundary {
            start: headers.beschreibung.x - COLUMN_MARGIN,
            end: payments_start,
        },
        zahlungseingang: ColumnBoundary {
            start: payments_start,
            end: eingang_end,
        },
        zahlungsausgang: ColumnBoundary { start: ausgang_start, end: saldo_start },
        saldo: ColumnBoundary { start: saldo_start, end: f64::INFINITY },
        header_y: headers.datum.y,
    }
}

pub fn interest_column_boundaries(headers: &InterestHeaderSet) -> InterestColumns {
    InterestColumns {
        datum: ColumnBoundary {
            start: 0.0,
            end: headers.zahlungsart.x - COLUMN_MARGIN,
        },
        zahlungsart: ColumnBoundary {
            start: headers.zahlungsart.x - COLUMN_MARGIN,
            end: headers.geldmarktfonds.x - COLUMN_MARGIN,
        },
        geldmarktfonds: ColumnBoundary {
            start: headers.geldmarktfonds.x - COLUMN_MARGIN,
            end: headers.stueck.x - COLUMN_MARGIN,
        },
        stueck: ColumnBoundary {
            start: headers.stueck.x - COLUMN_MARGIN,
            end: headers.kurs.x - COLUMN_MARGIN,
        },
        kurs: ColumnBoundary {
            start: headers.kurs.x - COLUMN_MARGIN,
            end: headers.betrag.x - COLUMN_MARGIN,
        },
        betrag: ColumnBoundary {
            start: headers.betrag.x - COLUMN_MARGIN,
            end: f64::INFINITY,
        },
        header_y: headers.datum.y,
    }
}

// MARK: tests
