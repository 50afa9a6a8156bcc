use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, PipelineConfig};
use crate::db::{init_db, load_catalog, save_catalog, Database};
use crate::domain::catalog::Catalog;
use crate::domain::preferences::Preferences;
use crate::domain::query::{Query, QueryFile};
use crate::errors::PipelineResult;

mod config;
mod db;
mod domain;
mod errors;
mod loaders;
mod pipeline;
mod scraper;
mod spreadsheets;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Build,
    Filter,
    All,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let step = match std::env::args().nth(1).as_deref() {
        None | Some("all") => Step::All,
        Some("build") => Step::Build,
        Some("filter") => Step::Filter,
        Some(other) => {
            error!(arg = other, "Unknown step; expected build, filter or all");
            std::process::exit(2);
        }
    };

    let app = AppConfig::from_env();
    let pipeline = match &app.facility_categories {
        Some(categories) => PipelineConfig::default().with_categories(categories),
        None => PipelineConfig::default(),
    };

    if let Err(e) = run(step, &app, &pipeline) {
        error!(error = %e, validation = e.is_validation(), "Pipeline failed");
        std::process::exit(1);
    }
}

fn run(step: Step, app: &AppConfig, pipeline: &PipelineConfig) -> PipelineResult<()> {
    let db = Database::new(app.catalog_db_path.clone());
    init_db(&db)?;

    if step != Step::Filter {
        let catalog = build_step(app, pipeline)?;
        save_catalog(&db, &catalog)?;
    }

    if step != Step::Build {
        let catalog = load_catalog(&db)?;
        if catalog.is_empty() {
            warn!(db = %app.catalog_db_path.display(), "Stored catalog is empty; run the build step first");
        }
        let query = load_query(&app.preferences_path)?;
        if query.is_empty() {
            info!("No preferences given; exporting the full catalog");
        }
        let result = pipeline::filter_catalog(&catalog, &query)?;
        if result.is_empty() {
            warn!("No apartments match the preferences");
        }

        let now = chrono::Local::now();
        std::fs::create_dir_all(&app.output_dir)?;
        let csv_path = spreadsheets::timestamped_path(&app.output_dir, now, "csv");
        let xlsx_path = spreadsheets::timestamped_path(&app.output_dir, now, "xlsx");
        spreadsheets::export_result_csv(&result, &csv_path)?;
        spreadsheets::export_result_xlsx(&result, &xlsx_path)?;

        info!(
            matches = result.len(),
            csv = %csv_path.display(),
            xlsx = %xlsx_path.display(),
            "Recommendation list written"
        );
    }

    Ok(())
}

/// Loads every input, normalizes the listings and merges them into a catalog.
fn build_step(app: &AppConfig, pipeline: &PipelineConfig) -> PipelineResult<Catalog> {
    let mut raw = loaders::load_raw_listings(&app.raw_listings_path)?;
    if let Some(dir) = &app.listing_html_dir {
        raw.extend(loaders::load_listing_pages(dir)?);
    }

    let listings = pipeline::normalize_listings(raw, pipeline);
    let facilities = loaders::load_facilities(&app.facilities_path)?;
    let incidents = loaders::load_incidents(&app.incidents_path)?;

    let catalog = pipeline::build_catalog(listings, &facilities, &incidents, pipeline);

    let catalog_csv = app.output_dir.join("apartment_catalog.csv");
    std::fs::create_dir_all(&app.output_dir)?;
    spreadsheets::export_result_csv(&catalog.to_result_set(), &catalog_csv)?;
    info!(path = %catalog_csv.display(), "Catalog CSV written");

    Ok(catalog)
}

/// Reads either a preferences file or a raw query file. A missing file means
/// no constraints.
fn load_query(path: &Path) -> PipelineResult<Query> {
    if !path.exists() {
        warn!(path = %path.display(), "No preferences file; returning the full catalog");
        return Ok(Query::new());
    }

    let text = std::fs::read_to_string(path)?;
    let json: serde_json::Value = serde_json::from_str(&text)?;
    if json.get("conditions").is_some() {
        serde_json::from_value::<QueryFile>(json)?.into_query()
    } else {
        serde_json::from_value::<Preferences>(json)?.to_query()
    }
}
