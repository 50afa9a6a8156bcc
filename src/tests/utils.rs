use crate::config::PipelineConfig;
use crate::db::{init_db, Database};
use crate::domain::catalog::Catalog;
use crate::domain::listing::RawListing;
use crate::domain::region::Region;
use crate::domain::sources::{FacilityRecord, IncidentRecord};
use crate::pipeline::{build_catalog, normalize_listings};
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns a fresh test database file with the catalog schema applied
pub fn init_test_db(prefix: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "{prefix}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path);
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

pub fn raw_listing(name: &str, address: &str, rent: &str) -> RawListing {
    RawListing {
        apartment_name: Some(name.to_string()),
        address: Some(address.to_string()),
        rent: Some(rent.to_string()),
        ..Default::default()
    }
}

pub fn facilities(category: &str, region: Region, n: usize) -> Vec<FacilityRecord> {
    (0..n).map(|_| FacilityRecord::new(category, region)).collect()
}

/// Five listings across four boroughs plus one unplaceable address.
pub fn sample_catalog() -> Catalog {
    let config = PipelineConfig::default();

    let mut pets_ok = raw_listing("Wall Tower", "40 Wall St, New York, NY 10005", "$2,000-$2,500/mo");
    pets_ok.dogs_policy = Some("Small dogs Allowed".into());
    pets_ok.pets_allowed = Some("No".into());
    pets_ok.school_name_1 = Some("PS 234".into());
    pets_ok.grades_1 = Some("PK-5".into());
    pets_ok.rating_1 = Some("9/10".into());

    let mut brooklyn = raw_listing("Court Lofts", "5 Court St, Brooklyn, NY 11201", "$2,800/mo");
    brooklyn.pets_allowed = Some("Yes".into());

    let mut no_pets = raw_listing("Astoria House", "30-01 31st St, Astoria, NY 11102", "$2,400/mo");
    no_pets.cats_policy = Some("Not allowed".into());

    let bronx = raw_listing("Grand Concourse", "900 Grand Concourse, Bronx, NY 10451", "$1,750/mo");
    let unplaced = raw_listing("Mystery", "Somewhere over the rainbow", "N/A");

    let listings = normalize_listings(vec![pets_ok, brooklyn, no_pets, bronx, unplaced], &config);

    let mut facility_rows = facilities("BUS STATION", Region::Manhattan, 3);
    facility_rows.extend(facilities("MUSEUM", Region::Manhattan, 2));
    facility_rows.extend(facilities("PUBLIC LIBRARY", Region::Queens, 4));
    facility_rows.extend(facilities("FIREHOUSE", Region::Bronx, 9));

    let incidents = vec![
        IncidentRecord { region: Region::Brooklyn },
        IncidentRecord { region: Region::Brooklyn },
        IncidentRecord { region: Region::Bronx },
    ];

    build_catalog(listings, &facility_rows, &incidents, &config)
}
