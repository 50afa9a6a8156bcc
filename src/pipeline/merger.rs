// src/pipeline/merger.rs

use tracing::info;

use crate::config::PipelineConfig;
use crate::domain::catalog::{Catalog, CatalogRow};
use crate::domain::listing::CanonicalListing;
use crate::domain::sources::{FacilityRecord, IncidentRecord};
use crate::pipeline::facilities::aggregate_facilities;
use crate::pipeline::safety::IncidentPresence;

/// Joins normalized listings with facility counts and borough safety.
///
/// Region and category keys arrive upper-case from the loaders, so both joins
/// compare like with like. Each listing yields exactly one row.
pub fn build_catalog(
    listings: Vec<CanonicalListing>,
    facilities: &[FacilityRecord],
    incidents: &[IncidentRecord],
    config: &PipelineConfig,
) -> Catalog {
    // Step 1: facility pivot, left-joined back on address
    let counts = aggregate_facilities(&listings, facilities, config);

    // Step 2: incident presence per borough, left-joined on region
    let presence = IncidentPresence::from_records(incidents);

    let rows: Vec<CatalogRow> = listings
        .into_iter()
        .map(|listing| {
            let facility_counts = config
                .facility_categories
                .iter()
                .map(|c| {
                    let n = counts
                        .for_address(&listing.address)
                        .and_then(|m| m.get(c))
                        .copied()
                        .unwrap_or(0);
                    (c.clone(), n)
                })
                .collect();

            CatalogRow {
                incidents_reported: presence.contains(listing.region),
                safety_level: config.safety.label_for(listing.region).to_string(),
                facility_counts,
                listing,
            }
        })
        .collect();

    info!(
        rows = rows.len(),
        categories = config.facility_categories.len(),
        incident_regions = presence.len(),
        "Catalog built"
    );
    Catalog::new(config.facility_categories.clone(), rows)
}
