//! Reading records and rendering results.

pub mod jsonl;
pub mod table;

pub use jsonl::{load_records, read_records, write_json};
pub use table::{render_comparison, render_table};
