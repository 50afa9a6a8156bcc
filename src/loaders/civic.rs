// src/loaders/civic.rs

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::domain::region::Region;
use crate::domain::sources::{FacilityRecord, IncidentRecord};
use crate::errors::{PipelineError, PipelineResult};

pub const FACILITY_CATEGORY_COLUMN: &str = "FACTYPE";
pub const REGION_COLUMN: &str = "BORO";

/// Reads the facilities CSV. Only `FACTYPE` and `BORO` are used; header case
/// does not matter.
pub fn load_facilities(path: &Path) -> PipelineResult<Vec<FacilityRecord>> {
    let file = File::open(path)?;
    let records = read_facilities(file, &path.display().to_string())?;
    info!(path = %path.display(), records = records.len(), "Loaded facilities");
    Ok(records)
}

pub fn read_facilities<R: Read>(reader: R, source_name: &str) -> PipelineResult<Vec<FacilityRecord>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let category_idx = column_index(&headers, FACILITY_CATEGORY_COLUMN, source_name)?;
    let region_idx = column_index(&headers, REGION_COLUMN, source_name)?;

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record?;
        let category = record.get(category_idx).unwrap_or("");
        if category.is_empty() {
            continue;
        }
        let region = Region::from_name(record.get(region_idx).unwrap_or(""));
        out.push(FacilityRecord::new(category, region));
    }
    Ok(out)
}

/// Reads the shooting incident CSV. Only the borough column is used.
pub fn load_incidents(path: &Path) -> PipelineResult<Vec<IncidentRecord>> {
    let file = File::open(path)?;
    let records = read_incidents(file, &path.display().to_string())?;
    info!(path = %path.display(), records = records.len(), "Loaded incidents");
    Ok(records)
}

pub fn read_incidents<R: Read>(reader: R, source_name: &str) -> PipelineResult<Vec<IncidentRecord>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let region_idx = column_index(&headers, REGION_COLUMN, source_name)?;

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record?;
        out.push(IncidentRecord {
            region: Region::from_name(record.get(region_idx).unwrap_or("")),
        });
    }
    Ok(out)
}

/// Finds a column after upper-casing the headers, so `boro`, `Boro` and
/// `BORO` all resolve.
fn column_index(headers: &StringRecord, column: &str, source_name: &str) -> PipelineResult<usize> {
    headers
        .iter()
        .position(|h| h.trim().to_uppercase() == column)
        .ok_or_else(|| PipelineError::MissingColumn {
            source_name: source_name.to_string(),
            column: column.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_facilities_with_any_header_case() {
        let csv = "facname,factype,Boro\n\
                   Port Authority,bus station,MANHATTAN\n\
                   Met,MUSEUM,Manhattan\n\
                   ,MUSEUM,Bronx\n\
                   Depot,BUS STATION,Hoboken\n";
        let records = read_facilities(csv.as_bytes(), "test").unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], FacilityRecord::new("BUS STATION", Region::Manhattan));
        assert_eq!(records[1].region, Region::Manhattan);
        assert_eq!(records[2].region, Region::Unknown);
    }

    #[test]
    fn reads_incident_boroughs() {
        let csv = "incident_key,boro\n1,BRONX\n2,BRONX\n3,QUEENS\n";
        let records = read_incidents(csv.as_bytes(), "test").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].region, Region::Queens);
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "incident_key,precinct\n1,40\n";
        let err = read_incidents(csv.as_bytes(), "shootings.csv").unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { ref column, .. } if column == "BORO"));
    }

    #[test]
    fn header_only_file_is_empty() {
        let records = read_facilities("FACTYPE,BORO\n".as_bytes(), "test").unwrap();
        assert!(records.is_empty());
    }
}
