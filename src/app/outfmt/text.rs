use std::io::Write;

use tabled::settings::{object::Rows, Alignment, Style};

use crate::render::RenderTable;
use crate::util::rw::WriteHandle;

use super::model::{Error, TableWriter};

/// Renders tables as bordered ASCII for terminal consumption.
pub struct TextWriter {
    w: WriteHandle,
}

impl TextWriter {
    pub fn new(w: WriteHandle) -> TextWriter {
        TextWriter { w }
    }
}

impl TableWriter for TextWriter {
    fn print_render_table(
        &mut self,
        name: &str,
        table_model: &RenderTable,
    ) -> Result<(), Error> {
        let map_write_err = |e| format!("{e}");

        writeln!(self.w, "{}", name).map_err(map_write_err)?;

        let mut table_bldr = tabled::builder::Builder::default();
        table_bldr.push_record(
            table_model
                .header
                .iter()
                .map(|h| h.to_uppercase())
                .collect::<Vec<String>>(),
        );
        for row in &table_model.rows {
            table_bldr.push_record(row);
        }
        if !table_model.footer.is_empty() {
            table_bldr.push_record(table_model.footer.clone());
        }

        let mut table = table_bldr.build();
        table.with(Style::ascii());
        // Center the header
        table.modify(Rows::first(), Alignment::center());

        writeln!(self.w, "{table}").map_err(map_write_err)?;

        for note in &table_model.notes {
            writeln!(self.w, "{note}").map_err(map_write_err)?;
        }

        writeln!(self.w).map_err(map_write_err)?;
        Ok(())
    }
}

// MARK: tests
