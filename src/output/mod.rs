//! Output formatting for responses.
//!
//! - [`terminal`] - JSON and CSV-style table rendering

mod terminal;

pub use terminal::{format_field, render, OutputFormat};
