pub mod basic;
pub mod date;
pub mod decimal;
pub mod os;
pub mod rc;
pub mod rw;
