use crate::config::PipelineConfig;
use crate::domain::catalog::Value;
use crate::domain::preferences::Preferences;
use crate::domain::query::{Condition, Operand, Predicate, Query};
use crate::domain::region::Region;
use crate::errors::PipelineError;
use crate::pipeline::{build_catalog, filter_catalog, normalize_listings};
use crate::tests::utils::{facilities, raw_listing, sample_catalog};

fn names(result: &crate::domain::catalog::ResultSet) -> Vec<String> {
    result
        .column_values("APARTMENT NAME")
        .unwrap()
        .into_iter()
        .map(|v| v.to_string())
        .collect()
}

#[test]
fn empty_query_returns_full_catalog() {
    let catalog = sample_catalog();
    let result = filter_catalog(&catalog, &Query::new()).unwrap();

    assert_eq!(result, catalog.to_result_set());
    assert_eq!(result.len(), 5);
}

#[test]
fn range_and_equality_are_conjoined() {
    let catalog = sample_catalog();
    let query = Query::from_conditions([
        (
            "AVERAGE RENT",
            Some(Condition::new("between", [Operand::Number(2000.0), Operand::Number(2800.0)])),
        ),
        ("IF_PETS_ALLOWED", Some(Condition::new("==", [Operand::from("Allowed")]))),
    ])
    .unwrap();

    let result = filter_catalog(&catalog, &query).unwrap();
    assert_eq!(names(&result), vec!["Wall Tower", "Court Lofts"]);

    let rents = result.column_values("AVERAGE RENT").unwrap();
    assert!(rents.iter().all(|v| matches!(v, Value::Number(n) if (2000.0..=2800.0).contains(n))));
    let pets = result.column_values("IF_PETS_ALLOWED").unwrap();
    assert!(pets.iter().all(|v| **v == Value::Text("Allowed".into())));
}

#[test]
fn filtering_is_repeatable() {
    let catalog = sample_catalog();
    let before = catalog.clone();
    let query = Query::new()
        .with_predicate(Predicate::LessThan {
            column: "AVERAGE RENT".into(),
            value: Operand::Number(2500.0),
        })
        .with_facilities(["MUSEUM"]);

    let first = filter_catalog(&catalog, &query).unwrap();
    let second = filter_catalog(&catalog, &query).unwrap();

    assert_eq!(first, second);
    assert_eq!(catalog, before);
}

#[test]
fn missing_rent_never_matches_rent_predicates() {
    let catalog = sample_catalog();
    let query = Query::new().with_predicate(Predicate::LessThan {
        column: "AVERAGE RENT".into(),
        value: Operand::Number(2000.0),
    });

    let result = filter_catalog(&catalog, &query).unwrap();
    assert_eq!(names(&result), vec!["Grand Concourse"]);
}

#[test]
fn safety_label_and_counts_are_filterable() {
    let catalog = sample_catalog();

    let query = Query::from_conditions([
        ("Safety_level", Some(Condition::new("==", [Operand::from("Caution Advised")]))),
        ("BORO", None),
    ])
    .unwrap();
    let result = filter_catalog(&catalog, &query).unwrap();
    assert_eq!(names(&result), vec!["Court Lofts"]);

    let query = Query::new().with_predicate(Predicate::GreaterThan {
        column: "museum".into(),
        value: Operand::Number(1.0),
    });
    let result = filter_catalog(&catalog, &query).unwrap();
    assert_eq!(names(&result), vec!["Wall Tower"]);
}

#[test]
fn borough_equality_uses_upper_case_names() {
    let catalog = sample_catalog();
    let query = Query::new().with_predicate(Predicate::Equals {
        column: "BORO".into(),
        value: Operand::Text(Region::Queens.as_str().into()),
    });

    let result = filter_catalog(&catalog, &query).unwrap();
    assert_eq!(names(&result), vec!["Astoria House"]);
    assert_eq!(
        result.column_values("PUBLIC LIBRARY").unwrap(),
        vec![&Value::Number(4.0)]
    );
}

#[test]
fn projection_keeps_identity_columns_and_requested_categories() {
    let categories = [
        "BUS STATION",
        "MUSEUM",
        "COMMERCIAL GARAGE AND PARKING LOT",
        "PUBLIC LIBRARY",
        "HOSPITAL",
        "PARK",
        "SCHOOL",
        "FIREHOUSE",
        "POLICE STATION",
        "POST OFFICE",
    ];
    let config = PipelineConfig::default().with_categories(categories);
    let listings = normalize_listings(
        vec![raw_listing("Downtown", "40 Wall St, New York, NY 10005", "$3,000/mo")],
        &config,
    );
    let catalog = build_catalog(listings, &facilities("PARK", Region::Manhattan, 2), &[], &config);
    assert_eq!(catalog.categories.len(), 10);

    let query = Query::new().with_facilities(["BUS STATION", "MUSEUM"]);
    let result = filter_catalog(&catalog, &query).unwrap();

    assert_eq!(
        result.columns,
        vec!["ADDRESS", "APARTMENT NAME", "AVERAGE RENT", "ZIP CODE", "CITY", "BUS STATION", "MUSEUM"]
    );
    assert!(result.rows.iter().all(|r| r.len() == 7));
}

#[test]
fn unknown_projection_category_is_rejected() {
    let catalog = sample_catalog();
    let query = Query::new().with_facilities(["BUS STATION", "ZOO"]);

    let err = filter_catalog(&catalog, &query).unwrap_err();
    assert!(matches!(err, PipelineError::UnknownCategory(ref c) if c == "ZOO"));
}

#[test]
fn unknown_column_is_rejected() {
    let catalog = sample_catalog();
    let query = Query::new().with_predicate(Predicate::Equals {
        column: "SCHOOL GRADE".into(),
        value: Operand::from("A"),
    });

    let err = filter_catalog(&catalog, &query).unwrap_err();
    assert!(matches!(err, PipelineError::UnknownColumn(_)));
}

#[test]
fn unsupported_operator_aborts_query_construction() {
    let err = Query::from_conditions([
        ("AVERAGE RENT", Some(Condition::new("<=", [Operand::Number(2000.0)]))),
    ])
    .unwrap_err();
    assert!(matches!(err, PipelineError::UnsupportedOperator { .. }));
}

#[test]
fn ordering_text_column_with_number_is_a_type_error() {
    let catalog = sample_catalog();
    let query = Query::new().with_predicate(Predicate::GreaterThan {
        column: "CITY".into(),
        value: Operand::Number(5.0),
    });

    let err = filter_catalog(&catalog, &query).unwrap_err();
    assert!(matches!(err, PipelineError::TypeMismatch { .. }));
}

#[test]
fn preferences_answers_drive_the_filter() {
    let catalog = sample_catalog();
    let prefs: Preferences = serde_json::from_str(
        r#"{
            "borough": "Manhattan",
            "price_range": "2000-2800",
            "pets": true,
            "facilities": ["BUS STATION", "MUSEUM"],
            "safety_level": "Not to matter"
        }"#,
    )
    .unwrap();

    let result = filter_catalog(&catalog, &prefs.to_query().unwrap()).unwrap();

    assert_eq!(names(&result), vec!["Wall Tower"]);
    assert_eq!(result.columns.len(), 7);
    assert_eq!(result.rows[0][5], Value::Number(3.0));
    assert_eq!(result.rows[0][6], Value::Number(2.0));
}

#[test]
fn school_columns_are_filterable() {
    let catalog = sample_catalog();
    let query = Query::from_conditions([
        ("school_name_1", Some(Condition::new("==", [Operand::from("PS 234")]))),
    ])
    .unwrap();

    let result = filter_catalog(&catalog, &query).unwrap();
    assert_eq!(names(&result), vec!["Wall Tower"]);
    assert_eq!(
        result.column_values("RATING_1").unwrap(),
        vec![&Value::Text("9/10".into())]
    );
}

#[test]
fn mistyped_ordering_fails_before_any_row_is_read() {
    let catalog = sample_catalog();

    // No row survives the first predicate, so the second is never evaluated per row.
    let query = Query::new()
        .with_predicate(Predicate::Equals {
            column: "BORO".into(),
            value: Operand::from("NOWHERE"),
        })
        .with_predicate(Predicate::Between {
            column: "AVERAGE RENT".into(),
            low: Operand::Number(1000.0),
            high: Operand::from("3000"),
        });
    let err = filter_catalog(&catalog, &query).unwrap_err();
    assert!(matches!(err, PipelineError::TypeMismatch { operand: "text", .. }));

    let empty = crate::domain::catalog::Catalog::new(catalog.categories.clone(), vec![]);
    let query = Query::new().with_predicate(Predicate::GreaterThan {
        column: "CITY".into(),
        value: Operand::Number(5.0),
    });
    let err = filter_catalog(&empty, &query).unwrap_err();
    assert!(matches!(err, PipelineError::TypeMismatch { ref column, .. } if column == "CITY"));
}
