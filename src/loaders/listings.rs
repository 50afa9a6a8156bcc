use csv::ReaderBuilder;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::domain::listing::RawListing;
use crate::errors::PipelineResult;
use crate::scraper::parse_listing_page;

/// Reads raw listings saved by the scraper as CSV.
pub fn load_raw_listings(path: &Path) -> PipelineResult<Vec<RawListing>> {
    let file = File::open(path)?;
    let listings = read_raw_listings(file)?;
    info!(path = %path.display(), listings = listings.len(), "Loaded raw listings");
    Ok(listings)
}

pub fn read_raw_listings<R: Read>(reader: R) -> PipelineResult<Vec<RawListing>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut out = Vec::new();
    for record in reader.deserialize::<RawListing>() {
        out.push(record?);
    }
    Ok(out)
}

/// Parses every `.html` file in `dir` as a saved listing detail page.
/// Pages that fail to parse are skipped with a warning.
pub fn load_listing_pages(dir: &Path) -> PipelineResult<Vec<RawListing>> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("html")))
        .collect();
    paths.sort();

    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let html = fs::read_to_string(&path)?;
        match parse_listing_page(&html) {
            Ok(listing) => out.push(listing),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping listing page"),
        }
    }
    info!(dir = %dir.display(), listings = out.len(), "Parsed saved listing pages");
    Ok(out)
}
