//! File input and output: historical sales import and dataset export.

pub mod export;
pub mod sales;
