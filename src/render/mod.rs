//! Text, chart and file renderers.
//!
//! Text renderers return `String`s; the caller decides where they go.

pub mod chart;
pub mod export;
pub mod table;

pub use chart::{bar, count_chart, MAX_BAR_LENGTH};
pub use export::{write_csv, write_json, ExportError};
pub use table::{Align, Table};
