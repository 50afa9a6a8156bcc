use std::collections::BTreeSet;

use crate::domain::region::Region;
use crate::domain::sources::IncidentRecord;

pub const UNKNOWN_SAFETY: &str = "Unknown";

/// Static borough → safety label rules, checked in order.
/// Filters match these labels by exact string equality.
#[derive(Debug, Clone)]
pub struct SafetyTable {
    rules: Vec<(Region, String)>,
    fallback: String,
}

impl SafetyTable {
    pub fn new(rules: Vec<(Region, String)>) -> Self {
        Self {
            rules,
            fallback: UNKNOWN_SAFETY.to_string(),
        }
    }

    pub fn label_for(&self, region: Region) -> &str {
        self.rules
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, label)| label.as_str())
            .unwrap_or(&self.fallback)
    }
}

impl Default for SafetyTable {
    fn default() -> Self {
        Self::new(vec![
            (Region::Brooklyn, "Caution Advised".to_string()),
            (Region::Queens, "Relatively Safe".to_string()),
            (Region::Bronx, "Relatively Safe".to_string()),
            (Region::Manhattan, "Very Safe".to_string()),
        ])
    }
}

/// Boroughs with at least one recorded incident. Presence only, never volume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentPresence {
    regions: BTreeSet<Region>,
}

impl IncidentPresence {
    pub fn from_records(records: &[IncidentRecord]) -> Self {
        Self {
            regions: records
                .iter()
                .map(|r| r.region)
                .filter(|r| *r != Region::Unknown)
                .collect(),
        }
    }

    pub fn contains(&self, region: Region) -> bool {
        self.regions.contains(&region)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }
}
