use std::path::PathBuf;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use crate::render::RenderTable;
use crate::util::date::parse_statement_date;
use crate::util::decimal::parse_eur_decimal_opt;

use super::model::{Error, TableWriter};

/// Columns carrying money amounts; their cells become numeric with a
/// German-style Euro format.
const MONEY_HEADERS: &[&str] = &[
    "Zahlungseingang",
    "Zahlungsausgang",
    "Saldo",
    "Kurs",
    "Kurs pro Stück",
    "Betrag",
    "Gekauft",
    "Verkauft",
    "Investiert",
    "Realisiert",
    "Netto-Cashflow",
    "Unrealisiert",
    "Aktueller Wert",
    "Gesamt-P&L",
    "Kurswert",
];

/// Unit-count columns: numeric, but no currency sign.
const QUANTITY_HEADERS: &[&str] = &["Stück"];

/// Date columns, written as real date cells.
const DATE_HEADERS: &[&str] = &["Datum"];

enum CellKind {
    Money,
    Quantity,
    Date,
    Text,
}

fn cell_kind(header: &str) -> CellKind {
    if MONEY_HEADERS.contains(&header) {
        CellKind::Money
    } else if QUANTITY_HEADERS.contains(&header) {
        CellKind::Quantity
    } else if DATE_HEADERS.contains(&header) {
        CellKind::Date
    } else {
        CellKind::Text
    }
}

/// Writes each table into its own worksheet of one workbook. The workbook
/// is saved on finish().
pub struct XlsxWriter {
    workbook: Workbook,
    out_path: PathBuf,
}

impl XlsxWriter {
    pub fn new(out_path: &String) -> XlsxWriter {
        XlsxWriter { workbook: Workbook::new(), out_path: PathBuf::from(out_path) }
    }
}

impl TableWriter for XlsxWriter {
    fn print_render_table(
        &mut self,
        name: &str,
        table_model: &RenderTable,
    ) -> Result<(), Error> {
        let money_format = Format::new().set_num_format("#,##0.00 \"€\"");
        let quantity_format = Format::new().set_num_format("0.00");
        let date_format = Format::new().set_num_format("dd.mm.yyyy");

        let sheet = self.workbook.add_worksheet();
        let _ = sheet.set_name(name);

        let kinds: Vec<CellKind> =
            table_model.header.iter().map(|h| cell_kind(h)).collect();

        for (c_i, header) in table_model.header.iter().enumerate() {
            sheet
                .write(0, c_i as u16, header.as_str())
                .map_err(|e| e.to_string())?;
        }

        for (r_i, row) in table_model.rows.iter().enumerate() {
            let row_i = r_i as u32 + 1;
            for (c_i, cell_str) in row.iter().enumerate() {
                let col_i = c_i as u16;
                let kind = kinds.get(c_i).unwrap_or(&CellKind::Text);
                match kind {
                    CellKind::Money | CellKind::Quantity => {
                        match parse_eur_decimal_opt(cell_str)
                            .and_then(|d| d.to_f64())
                        {
                            Some(num) => {
                                let format = match kind {
                                    CellKind::Money => &money_format,
                                    _ => &quantity_format,
                                };
                                sheet
                                    .write_with_format(
                                        row_i, col_i, num, format,
                                    )
                                    .map_err(|e| e.to_string())?;
                            }
                            None => {
                                sheet
                                    .write(row_i, col_i, cell_str.as_str())
                                    .map_err(|e| e.to_string())?;
                            }
                        }
                    }
                    CellKind::Date => match parse_statement_date(cell_str) {
                        Some(date) => {
                            let date_data = ExcelDateTime::from_ymd(
                                date.year().try_into().unwrap(),
                                u8::from(date.month()),
                                date.day(),
                            )
                            .map_err(|e| e.to_string())?;
                            sheet
                                .write_with_format(
                                    row_i,
                                    col_i,
                                    &date_data,
                                    &date_format,
                                )
                                .map_err(|e| e.to_string())?;
                        }
                        None => {
                            sheet
                                .write(row_i, col_i, cell_str.as_str())
                                .map_err(|e| e.to_string())?;
                        }
                    },
                    CellKind::Text => {
                        sheet
                            .write(row_i, col_i, cell_str.as_str())
                            .map_err(|e| e.to_string())?;
                    }
                }
            }
        }

        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<(), Error> {
        self.workbook
            .save(&self.out_path)
            .map_err(|e| format!("Failed to save {:?}: {}", self.out_path, e))
    }
}
