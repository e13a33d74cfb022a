use serde::Serialize;

/// One row of the cash (account transactions) table.
///
/// All fields are the raw cell text, whitespace-collapsed. Numeric
/// interpretation is left to downstream consumers (sanity checking, trading
/// reconstruction, exports), which tolerate garbled values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CashTransaction {
    pub datum: String,
    pub typ: String,
    pub beschreibung: String,
    pub zahlungseingang: String,
    pub zahlungsausgang: String,
    pub saldo: String,
}

impl CashTransaction {
    pub fn is_empty(&self) -> bool {
        self.datum.is_empty()
            && self.typ.is_empty()
            && self.beschreibung.is_empty()
            && self.zahlungseingang.is_empty()
            && self.zahlungsausgang.is_empty()
            && self.saldo.is_empty()
    }
}

/// One row of the money-market fund (interest) table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InterestTransaction {
    pub datum: String,
    pub zahlungsart: String,
    pub geldmarktfonds: String,
    pub stueck: String,
    pub kurs: String,
    pub betrag: String,
}

impl InterestTransaction {
    pub fn is_empty(&self) -> bool {
        self.datum.is_empty()
            && self.zahlungsart.is_empty()
            && self.geldmarktfonds.is_empty()
            && self.stueck.is_empty()
            && self.kurs.is_empty()
            && self.betrag.is_empty()
    }
}

/// Everything one parse run extracted, in page order, then row order within
/// each page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatementTransactions {
    pub cash: Vec<CashTransaction>,
    pub interest: Vec<InterestTransaction>,
}

impl StatementTransactions {
    pub fn extend(&mut self, other: StatementTransactions) {
        self.cash.extend(other.cash);
        self.interest.extend(other.interest);
    }
}
