pub mod app;
pub mod render;
pub mod statement;
pub mod tracing;
pub mod trading;
pub mod util;

#[cfg(feature = "pdf_parse")]
pub mod pdf;

extern crate lazy_static;

#[cfg(any(test, feature = "testlib"))]
pub mod testlib;
