use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::domain::region::RegionTable;
use crate::pipeline::safety::SafetyTable;

/// Facility types that contribute a count column to the catalog.
pub const DEFAULT_FACILITY_CATEGORIES: [&str; 4] = [
    "BUS STATION",
    "MUSEUM",
    "COMMERCIAL GARAGE AND PARKING LOT",
    "PUBLIC LIBRARY",
];

/// File locations, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_db_path: PathBuf,
    pub raw_listings_path: PathBuf,
    pub listing_html_dir: Option<PathBuf>,
    pub facilities_path: PathBuf,
    pub incidents_path: PathBuf,
    pub preferences_path: PathBuf,
    pub output_dir: PathBuf,
    /// Comma-separated override of the facility allow-list.
    pub facility_categories: Option<Vec<String>>,
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to files
    /// in the working directory.
    pub fn from_env() -> Self {
        // Load .env file if present (development)
        let _ = dotenv();

        Self {
            catalog_db_path: path_var("CATALOG_DB_PATH", "apartment_catalog.sqlite3"),
            raw_listings_path: path_var("RAW_LISTINGS_PATH", "apartment_data_raw.csv"),
            listing_html_dir: env::var("LISTING_HTML_DIR").ok().map(PathBuf::from),
            facilities_path: path_var("FACILITIES_PATH", "facilities_24v1.csv"),
            incidents_path: path_var("INCIDENTS_PATH", "shooting_data.csv"),
            preferences_path: path_var("PREFERENCES_PATH", "preferences.json"),
            output_dir: path_var("OUTPUT_DIR", "."),
            facility_categories: env::var("FACILITY_CATEGORIES")
                .ok()
                .map(|v| split_list(&v)),
        }
    }
}

fn path_var(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Domain tables handed to every pipeline stage.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper-case facility categories, in output column order.
    pub facility_categories: Vec<String>,
    pub regions: RegionTable,
    pub safety: SafetyTable,
}

impl PipelineConfig {
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.facility_categories.clear();
        for category in categories {
            let category = category.as_ref().trim().to_uppercase();
            if !category.is_empty() && !self.facility_categories.contains(&category) {
                self.facility_categories.push(category);
            }
        }
        self
    }

    pub fn is_allowed_category(&self, category: &str) -> bool {
        self.facility_categories.iter().any(|c| c == category)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            facility_categories: DEFAULT_FACILITY_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            regions: RegionTable::default(),
            safety: SafetyTable::default(),
        }
    }
}
