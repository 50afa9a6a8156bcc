// src/domain/region.rs

use std::fmt;
use std::ops::RangeInclusive;

/// The five NYC boroughs, plus a catch-all for anything we cannot place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Manhattan,
    Brooklyn,
    Queens,
    Bronx,
    StatenIsland,
    Unknown,
}

impl Region {
    pub const BOROUGHS: [Region; 5] = [
        Region::Manhattan,
        Region::Brooklyn,
        Region::Queens,
        Region::Bronx,
        Region::StatenIsland,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Manhattan => "MANHATTAN",
            Region::Brooklyn => "BROOKLYN",
            Region::Queens => "QUEENS",
            Region::Bronx => "BRONX",
            Region::StatenIsland => "STATEN ISLAND",
            Region::Unknown => "Unknown",
        }
    }

    /// Parses a borough name as it appears in the civic datasets.
    /// Matching ignores case and surrounding whitespace; anything else is `Unknown`.
    pub fn from_name(name: &str) -> Region {
        let upper = name.trim().to_uppercase();
        Region::BOROUGHS
            .into_iter()
            .find(|r| r.as_str() == upper)
            .unwrap_or(Region::Unknown)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered ZIP range table. Ranges are inclusive and checked top to bottom,
/// so an earlier entry wins where ranges overlap.
#[derive(Debug, Clone)]
pub struct RegionTable {
    entries: Vec<(Region, RangeInclusive<u32>)>,
}

impl RegionTable {
    pub fn new(entries: Vec<(Region, RangeInclusive<u32>)>) -> Self {
        Self { entries }
    }

    /// Total: non-numeric or unmatched input yields `Region::Unknown`.
    pub fn classify(&self, zip_code: &str) -> Region {
        let zip_code = zip_code.trim();
        if zip_code.is_empty() || !zip_code.bytes().all(|b| b.is_ascii_digit()) {
            return Region::Unknown;
        }
        let Ok(zip) = zip_code.parse::<u32>() else {
            return Region::Unknown;
        };

        self.entries
            .iter()
            .find(|(_, range)| range.contains(&zip))
            .map(|(region, _)| *region)
            .unwrap_or(Region::Unknown)
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        // Brooklyn sits inside Queens' first sub-range and must be checked first.
        Self::new(vec![
            (Region::Manhattan, 10001..=10282),
            (Region::Brooklyn, 11201..=11256),
            (Region::Queens, 11001..=11436),
            (Region::Queens, 11691..=11697),
            (Region::Bronx, 10451..=10475),
            (Region::StatenIsland, 10301..=10314),
        ])
    }
}
