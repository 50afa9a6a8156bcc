use chrono::{DateTime, Local};
use csv::Writer;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::catalog::ResultSet;
use crate::errors::PipelineResult;

pub const RECOMMENDATION_SUFFIX: &str = "recommendation_for_user";

/// `[YYYY-MM-DD HH:MM:SS]recommendation_for_user.<ext>` inside `dir`.
pub fn timestamped_path(dir: &Path, now: DateTime<Local>, extension: &str) -> PathBuf {
    let stamp = now.format("%Y-%m-%d %H:%M:%S");
    dir.join(format!("[{stamp}]{RECOMMENDATION_SUFFIX}.{extension}"))
}

pub fn export_result_csv(result: &ResultSet, path: &Path) -> PipelineResult<()> {
    let file = std::fs::File::create(path)?;
    write_result_csv(result, file)
}

/// Header row first, missing cells as empty fields.
pub fn write_result_csv<W: Write>(result: &ResultSet, out: W) -> PipelineResult<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(&result.columns)?;
    for row in &result.rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
