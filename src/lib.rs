// src/lib.rs

pub mod config;
pub mod date_range;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod source;

pub use error::{Error, Result};
