use crate::domain::region::Region;

/// A point of interest from the city facilities dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityRecord {
    /// Upper-case facility type, e.g. `BUS STATION`.
    pub category: String,
    pub region: Region,
}

impl FacilityRecord {
    pub fn new(category: &str, region: Region) -> Self {
        Self {
            category: category.trim().to_uppercase(),
            region,
        }
    }
}

/// A shooting incident. Only its borough is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncidentRecord {
    pub region: Region,
}
