mod export;
mod filter;

pub use export::{export_csv, export_to_file, ExportRow};
pub use filter::{FilterOptions, Selection, VisitFilter};
