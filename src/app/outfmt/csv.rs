use std::{fs::File, io, path::PathBuf};

use crate::render::RenderTable;
use crate::util::os::mk_writable_dir;
use crate::util::rw::WriteHandle;

use super::model::{Error, TableWriter};

/// German-convention CSV: semicolon-separated, so money values with `,`
/// decimals survive in spreadsheet apps. Fields containing the separator
/// are quoted.
const CSV_DELIMITER: u8 = b';';

enum CsvTarget {
    /// One .csv file per table, under a directory.
    Dir(PathBuf),
    /// All tables to one stream, with a comment line naming each table.
    Writer(WriteHandle),
}

pub struct CsvWriter {
    target: CsvTarget,
    tables_written: u32,
}

impl CsvWriter {
    pub fn new(out_dir: &String) -> Result<CsvWriter, io::Error> {
        let dir_path = PathBuf::from(out_dir);
        mk_writable_dir(&dir_path)?;
        Ok(CsvWriter { target: CsvTarget::Dir(dir_path), tables_written: 0 })
    }

    pub fn new_to_writer(w: WriteHandle) -> CsvWriter {
        CsvWriter { target: CsvTarget::Writer(w), tables_written: 0 }
    }

    fn write_table<W: io::Write>(
        table_model: &RenderTable,
        w: W,
    ) -> Result<(), Error> {
        let mut csv_w = csv::WriterBuilder::new()
            .delimiter(CSV_DELIMITER)
            .from_writer(w);

        csv_w
            .write_record(&table_model.header)
            .map_err(|e| e.to_string())?;
        for row in &table_model.rows {
            csv_w.write_record(row).map_err(|e| e.to_string())?;
        }
        if !table_model.footer.is_empty() {
            csv_w
                .write_record(&table_model.footer)
                .map_err(|e| e.to_string())?;
        }

        let n_cols = table_model.header.len();
        for note in &table_model.notes {
            let mut note_record = Vec::<String>::with_capacity(n_cols);
            note_record.resize(n_cols, String::new());
            note_record[0] = note.clone();
            csv_w.write_record(note_record).map_err(|e| e.to_string())?;
        }

        csv_w.flush().map_err(|e| e.to_string())?;
        Ok(())
    }
}

impl TableWriter for CsvWriter {
    fn print_render_table(
        &mut self,
        name: &str,
        table_model: &RenderTable,
    ) -> Result<(), Error> {
        match &mut self.target {
            CsvTarget::Dir(out_dir) => {
                let file_path = out_dir.join(format!("{name}.csv"));
                let fp = File::create(&file_path).map_err(|e| {
                    format!("Failed to create {:?}: {}", file_path.to_str(), e)
                })?;
                Self::write_table(table_model, fp)?;
            }
            CsvTarget::Writer(w) => {
                use std::io::Write;
                if self.tables_written > 0 {
                    writeln!(w).map_err(|e| e.to_string())?;
                }
                writeln!(w, "# {name}").map_err(|e| e.to_string())?;
                Self::write_table(table_model, w.clone())?;
            }
        }
        self.tables_written += 1;
        Ok(())
    }
}

// MARK: tests
