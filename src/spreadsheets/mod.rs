pub mod export_csv;
pub mod export_xlsx;

pub use export_csv::{export_result_csv, timestamped_path};
pub use export_xlsx::export_result_xlsx;
