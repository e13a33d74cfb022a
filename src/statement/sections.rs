use super::fragment::TextFragment;

/// Start markers match the whole (trimmed) fragment; end markers match by
/// substring, since templates append page numbers or totals to them.
pub const CASH_START_MARKERS: &[&str] =
    &["UMSATZÜBERSICHT", "TRANSAZIONI SUL CONTO", "ACCOUNT TRANSACTIONS"];
pub const CASH_END_MARKERS: &[&str] =
    &["BARMITTELÜBERSICHT", "CASH SUMMARY", "BALANCE OVERVIEW"];

pub const INTEREST_START_MARKERS: &[&str] =
    &["TRANSAKTIONSÜBERSICHT", "TRANSACTION OVERVIEW", "TRANSACTIONS"];
pub const INTEREST_END_MARKERS: &[&str] = &[
    "HINWEISE ZUM KONTOAUSZUG",
    "NOTES TO ACCOUNT STATEMENT",
    "ACCOUNT STATEMENT NOTES",
];

/// Where a section's start and end markers sit on the current page, if they
/// appear on it at all.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectionMarkers {
    pub start_y: Option<f64>,
    pub end_y: Option<f64>,
}

pub fn scan_markers(
    items: &[TextFragment],
    start_labels: &[&str],
    end_labels: &[&str],
) -> SectionMarkers {
    let start_y = items
        .iter()
        .find(|it| start_labels.contains(&it.trimmed()))
        .map(|it| it.y);
    let end_y = items
        .iter()
        .find(|it| {
            let t = it.trimmed();
            end_labels.iter().any(|l| t.contains(l))
        })
        .map(|it| it.y);
    SectionMarkers { start_y, end_y }
}

impl SectionMarkers {
    /// Whether this page's content should be scanned as part of the section.
    /// True when the section was already open from an earlier page, or this
    /// page carries the start marker.
    pub fn should_process(&self, already_inside: bool) -> bool {
        already_inside || self.start_y.is_some()
    }

    /// Restricts the page to the in-section band: at or below the start
    /// marker, strictly above the end marker. A page that both starts and
    /// ends a section in its interior is cropped on both sides.
    pub fn crop(&self, items: &[TextFragment]) -> Vec<TextFragment> {
        items
            .iter()
            .filter(|it| {
                self.start_y.map_or(true, |sy| it.y <= sy)
                    && self.end_y.map_or(true, |ey| it.y > ey)
            })
            .cloned()
            .collect()
    }

    /// The section flag to carry into the next page, applied after this
    /// page's extraction. An end marker always closes the section, even if
    /// a start marker appeared on the same page.
    pub fn next_inside(&self, should_process: bool) -> bool {
        if self.end_y.is_some() {
            false
        } else {
            should_process
        }
    }
}

/// Per-section "currently inside" flags, carried across pages so a table
/// continuing onto a later page without a repeated start marker is still
/// scanned.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectionState {
    pub in_cash: bool,
    pub in_interest: bool,
}

// MARK: tests
