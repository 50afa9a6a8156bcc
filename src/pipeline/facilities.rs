// src/pipeline/facilities.rs

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::domain::listing::CanonicalListing;
use crate::domain::region::Region;
use crate::domain::sources::FacilityRecord;

/// Per-address facility counts, one entry per configured category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityCounts {
    by_address: HashMap<String, BTreeMap<String, u64>>,
}

impl FacilityCounts {
    pub fn for_address(&self, address: &str) -> Option<&BTreeMap<String, u64>> {
        self.by_address.get(address)
    }
}

/// Counts allow-listed facilities in each listing's borough.
///
/// The join is borough-wide, so a count is regional density rather than
/// walking distance. The pivot is keyed by address alone: listings sharing an
/// address share one entry, and each of them adds its own join rows to it.
pub fn aggregate_facilities(
    listings: &[CanonicalListing],
    facilities: &[FacilityRecord],
    config: &PipelineConfig,
) -> FacilityCounts {
    // (a) allow-list, then per-borough totals so the join is not a cross product
    let mut per_region: HashMap<Region, BTreeMap<&str, u64>> = HashMap::new();
    let mut kept = 0usize;
    for facility in facilities {
        if !config.is_allowed_category(&facility.category) || facility.region == Region::Unknown {
            continue;
        }
        kept += 1;
        *per_region
            .entry(facility.region)
            .or_default()
            .entry(facility.category.as_str())
            .or_insert(0) += 1;
    }
    debug!(total = facilities.len(), kept, "Filtered facilities to allow-list");

    // (d) every address starts with an explicit zero for every category
    let zeroes: BTreeMap<String, u64> = config
        .facility_categories
        .iter()
        .map(|c| (c.clone(), 0))
        .collect();
    let mut by_address: HashMap<String, BTreeMap<String, u64>> = HashMap::new();

    // (b) + (c) join on borough and pivot on (address, category)
    for listing in listings {
        let counts = by_address
            .entry(listing.address.clone())
            .or_insert_with(|| zeroes.clone());

        if let Some(regional) = per_region.get(&listing.region) {
            for (category, n) in regional {
                *counts.entry((*category).to_string()).or_insert(0) += n;
            }
        }
    }

    info!(
        addresses = by_address.len(),
        regions = per_region.len(),
        "Built facility pivot"
    );
    FacilityCounts { by_address }
}
