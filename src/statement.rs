pub mod columns;
pub mod fragment;
pub mod headers;
pub mod model;
pub mod parse;
pub mod rows;
pub mod sanity;
pub mod sections;
pub mod stats;
