// End-to-end: raw CSV text in, filtered result out.

use crate::config::PipelineConfig;
use crate::domain::catalog::Value;
use crate::domain::listing::PetPolicy;
use crate::domain::query::Query;
use crate::domain::region::Region;
use crate::loaders::civic::{read_facilities, read_incidents};
use crate::loaders::listings::read_raw_listings;
use crate::pipeline::{build_catalog, filter_catalog, normalize_listings};
use crate::tests::utils::raw_listing;

#[test]
fn manhattan_and_brooklyn_listings_get_regional_counts_and_labels() {
    let config = PipelineConfig::default();
    let listings = normalize_listings(
        vec![
            raw_listing("Downtown", "40 Wall St, New York, NY 10005", "$3,000/mo"),
            raw_listing("Heights", "5 Court St, Brooklyn, NY 11201", "$2,500/mo"),
        ],
        &config,
    );
    let facilities = read_facilities(
        "FACTYPE,BORO\nBUS STATION,MANHATTAN\nBUS STATION,MANHATTAN\nBUS STATION,MANHATTAN\n".as_bytes(),
        "facilities",
    )
    .unwrap();

    let catalog = build_catalog(listings, &facilities, &[], &config);

    assert_eq!(catalog.len(), 2);
    let manhattan = &catalog.rows[0];
    let brooklyn = &catalog.rows[1];

    assert_eq!(manhattan.listing.region, Region::Manhattan);
    assert_eq!(manhattan.facility_count("BUS STATION"), 3);
    assert_eq!(manhattan.safety_level, "Very Safe");

    assert_eq!(brooklyn.listing.region, Region::Brooklyn);
    assert_eq!(brooklyn.facility_count("BUS STATION"), 0);
    assert_eq!(brooklyn.safety_level, "Caution Advised");
}

#[test]
fn raw_csv_to_recommendation() {
    let raw_csv = "Apartment Name,Address,Rent,Dogs Policy,Cats Policy,Large Dogs Policy,Small Dogs Policy,Pets Allowed\n\
                   Gold,\"100 Gold St, New York, NY 10038\",\"$2,000-$2,500/mo\",Allowed,N/A,N/A,N/A,No\n\
                   Pier,\"1 Pier Rd, Staten Island, NY 10301\",$3000+/mo,N/A,N/A,N/A,N/A,Yes\n\
                   Ghost,,$1000/mo,N/A,N/A,N/A,N/A,N/A\n";
    let facilities_csv = "facname,factype,boro\nMet,MUSEUM,Manhattan\nSnug,MUSEUM,Staten Island\n";
    let incidents_csv = "INCIDENT_KEY,BORO\n1,MANHATTAN\n2,MANHATTAN\n";

    let config = PipelineConfig::default();
    let raw = read_raw_listings(raw_csv.as_bytes()).unwrap();
    assert_eq!(raw.len(), 3);

    let listings = normalize_listings(raw, &config);
    assert_eq!(listings.len(), 2, "listing without address is dropped");
    assert_eq!(listings[0].average_rent, Some(2250.0));
    assert_eq!(listings[0].pet_policy, PetPolicy::Allowed);
    assert_eq!(listings[1].average_rent, Some(3000.0));
    assert_eq!(listings[1].region, Region::StatenIsland);

    let facilities = read_facilities(facilities_csv.as_bytes(), "facilities").unwrap();
    let incidents = read_incidents(incidents_csv.as_bytes(), "incidents").unwrap();
    let catalog = build_catalog(listings, &facilities, &incidents, &config);

    let gold = &catalog.rows[0];
    assert_eq!(gold.facility_count("MUSEUM"), 1);
    assert!(gold.incidents_reported);
    let pier = &catalog.rows[1];
    assert_eq!(pier.facility_count("MUSEUM"), 1);
    assert_eq!(pier.safety_level, "Unknown");
    assert!(!pier.incidents_reported);

    let query = Query::new().with_facilities(["MUSEUM"]);
    let result = filter_catalog(&catalog, &query).unwrap();
    assert_eq!(
        result.columns,
        vec!["ADDRESS", "APARTMENT NAME", "AVERAGE RENT", "ZIP CODE", "CITY", "MUSEUM"]
    );
    assert_eq!(
        result.column_values("ZIP CODE").unwrap(),
        vec![&Value::Text("10038".into()), &Value::Text("10301".into())]
    );
}
