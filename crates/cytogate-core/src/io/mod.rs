pub mod export;
pub mod fcs;

pub use export::{export_metadata_json, export_selection, resolve_output_path, ExportFormat};
pub use fcs::{read_fcs, FcsHeader, FcsReader};
