/// A fully-stringified table, ready for any of the output writers.
/// The footer is rendered as a summary row; notes follow the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: Vec<String>,
    pub notes: Vec<String>,
}

impl RenderTable {
    pub fn with_header(header: &[&str]) -> RenderTable {
        RenderTable {
            header: header.iter().map(|h| h.to_string()).collect(),
            ..Default::default()
        }
    }
}
