// The general-purpose error type used throughout the crate.
// Errors here are presented to users, not matched on, so a plain
// String keeps the propagation sites simple.
pub type SError = String;

#[macro_export]
macro_rules! write_errln {
    ($w:expr, $($arg:tt)*) => {{
        use std::io::Write;
        let _ = writeln!($w, $($arg)*);
    }};
}
