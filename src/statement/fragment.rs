use serde::{Deserialize, Serialize};

/// One positioned run of text extracted from a PDF page.
///
/// Coordinates are PDF user-space points: y = 0 is near the page bottom and
/// grows upward. Fragments arrive in arbitrary order; nothing here may
/// assume reading order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl TextFragment {
    pub fn new(text: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        TextFragment { text: text.to_string(), x, y, width, height }
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}
