pub mod csv;
pub mod model;
pub mod text;

#[cfg(feature = "xlsx_write")]
pub mod xlsx;
