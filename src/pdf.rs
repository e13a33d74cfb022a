use std::path::Path;

use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};

use crate::statement::fragment::TextFragment;
use crate::util::basic::SError;

/// An OutputDev that collects positioned text fragments, one list per page.
///
/// pdf-extract emits individual characters with their text matrix; word
/// boundaries (one show-text operation) delimit fragments, which matches
/// how the layout parser expects statement cells to arrive. Coordinates
/// stay in PDF user space: y = 0 near the page bottom, growing upward.
pub struct FragmentCollector {
    pages: Vec<Vec<TextFragment>>,

    // The fragment being accumulated
    word: String,
    word_x: f64,
    word_y: f64,
    word_end: f64,
    word_height: f64,
}

impl FragmentCollector {
    pub fn new() -> FragmentCollector {
        FragmentCollector {
            pages: Vec::new(),
            word: String::new(),
            word_x: 0.0,
            word_y: 0.0,
            word_end: 0.0,
            word_height: 0.0,
        }
    }

    pub fn into_pages(mut self) -> Vec<Vec<TextFragment>> {
        self.flush_word();
        self.pages
    }

    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.word);
        let frag = TextFragment {
            text,
            x: self.word_x,
            y: self.word_y,
            width: (self.word_end - self.word_x).max(0.0),
            height: self.word_height,
        };
        if let Some(page) = self.pages.last_mut() {
            page.push(frag);
        }
        self.word_height = 0.0;
    }
}

impl OutputDev for FragmentCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.flush_word();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let (x, y) = (trm.m31, trm.m32);
        // The rendered glyph size: the text matrix applied to a
        // font_size-sided square, reduced to one side length.
        let tfs_x = (trm.m11 + trm.m21) * font_size;
        let tfs_y = (trm.m12 + trm.m22) * font_size;
        let tfs = (tfs_x * tfs_y).abs().sqrt();

        if self.word.is_empty() {
            self.word_x = x;
            self.word_y = y;
        }
        self.word.push_str(char);
        self.word_end = x + width * tfs;
        self.word_height = self.word_height.max(tfs);
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        self.flush_word();
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        self.flush_word();
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        self.flush_word();
        Ok(())
    }
}

/// Extracts all pages' fragments from a loaded PDF document.
pub fn extract_fragments(
    doc: &Document,
) -> Result<Vec<Vec<TextFragment>>, SError> {
    let mut collector = FragmentCollector::new();
    pdf_extract::output_doc(doc, &mut collector)
        .map_err(|e| format!("Failed to extract text: {e}"))?;
    Ok(collector.into_pages())
}

pub fn extract_fragments_from_path(
    path: &Path,
) -> Result<Vec<Vec<TextFragment>>, SError> {
    tracing::info!("Extracting fragments from {}", path.to_string_lossy());
    let doc = Document::load(path)
        .map_err(|e| format!("Failed to load {path:?}: {e}"))?;
    extract_fragments(&doc)
}
