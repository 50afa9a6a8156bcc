use crate::config::PipelineConfig;
use crate::db::{load_catalog, save_catalog};
use crate::domain::region::Region;
use crate::pipeline::{build_catalog, normalize_listings};
use crate::domain::query::{Operand, Predicate, Query};
use crate::pipeline::filter_catalog;
use crate::spreadsheets::export_csv::write_result_csv;
use crate::tests::utils::{facilities, init_test_db, raw_listing, sample_catalog};

#[test]
fn stored_catalog_filters_like_the_original() {
    let db = init_test_db("persistence_test");
    let catalog = sample_catalog();
    save_catalog(&db, &catalog).unwrap();

    let loaded = load_catalog(&db).unwrap();
    assert_eq!(loaded, catalog);
    assert_eq!(loaded.rows[0].listing.schools[0].name.as_deref(), Some("PS 234"));

    let query = Query::new().with_predicate(Predicate::Equals {
        column: "IF_PETS_ALLOWED".into(),
        value: Operand::from("Not Allowed"),
    });
    assert_eq!(
        filter_catalog(&loaded, &query).unwrap(),
        filter_catalog(&catalog, &query).unwrap()
    );
}

#[test]
fn catalog_csv_has_upper_case_headers() {
    let catalog = sample_catalog();
    let mut buf = Vec::new();
    write_result_csv(&catalog.to_result_set(), &mut buf).unwrap();

    let text = String::from_utf8(buf).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header, header.to_uppercase());
    assert!(header.starts_with("ADDRESS,APARTMENT NAME,RENT,AVERAGE RENT"));
    assert!(header.contains("APPLIANCES,SCHOOL_NAME_1,GRADES_1,RANK_1,RATING_1,SCHOOL_NAME_2"));
    assert!(header.ends_with("INCIDENTS REPORTED,SAFETY_LEVEL"));
    assert_eq!(text.lines().count(), 1 + catalog.len());
}

#[test]
fn repeated_categories_still_save() {
    let db = init_test_db("persistence_dup_test");
    let config = PipelineConfig::default().with_categories(["MUSEUM", "Museum", "PARK"]);
    let listings = normalize_listings(
        vec![raw_listing("Downtown", "40 Wall St, New York, NY 10005", "$3,000/mo")],
        &config,
    );
    let catalog = build_catalog(listings, &facilities("MUSEUM", Region::Manhattan, 2), &[], &config);
    assert_eq!(catalog.categories, vec!["MUSEUM", "PARK"]);

    save_catalog(&db, &catalog).unwrap();
    let loaded = load_catalog(&db).unwrap();
    assert_eq!(loaded.rows[0].facility_count("MUSEUM"), 2);
    assert_eq!(loaded.categories, vec!["MUSEUM", "PARK"]);
}
