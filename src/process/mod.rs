// src/process/mod.rs

pub mod normalize;
pub mod raw_table;
pub mod reshape;
pub mod table;
pub mod write;

pub use raw_table::{RawDataset, RawRecord};
pub use reshape::reshape;
pub use table::{Cell, Table};
pub use write::write_report;
