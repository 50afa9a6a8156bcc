use serde::Deserialize;
use std::fmt;

use crate::domain::region::Region;

pub const UNKNOWN_ZIP: &str = "unknown";

/// One listing as it came off the listing page. Nothing here is validated.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawListing {
    #[serde(rename = "Apartment Name", default)]
    pub apartment_name: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "Rent", default)]
    pub rent: Option<String>,
    #[serde(rename = "Features", default)]
    pub features: Option<String>,
    #[serde(rename = "Appliances", default)]
    pub appliances: Option<String>,

    // Independently sourced pet policy fields
    #[serde(rename = "Dogs Policy", default)]
    pub dogs_policy: Option<String>,
    #[serde(rename = "Cats Policy", default)]
    pub cats_policy: Option<String>,
    #[serde(rename = "Large Dogs Policy", default)]
    pub large_dogs_policy: Option<String>,
    #[serde(rename = "Small Dogs Policy", default)]
    pub small_dogs_policy: Option<String>,
    #[serde(rename = "Pets Allowed", default)]
    pub pets_allowed: Option<String>,

    // Nearby schools, up to three slots. Rank and rating come from
    // different page layouts, so a slot rarely has both.
    #[serde(rename = "school_name_1", default)]
    pub school_name_1: Option<String>,
    #[serde(rename = "Grades_1", default)]
    pub grades_1: Option<String>,
    #[serde(rename = "Rank_1", default)]
    pub rank_1: Option<String>,
    #[serde(rename = "Rating_1", default)]
    pub rating_1: Option<String>,
    #[serde(rename = "school_name_2", default)]
    pub school_name_2: Option<String>,
    #[serde(rename = "Grades_2", default)]
    pub grades_2: Option<String>,
    #[serde(rename = "Rank_2", default)]
    pub rank_2: Option<String>,
    #[serde(rename = "Rating_2", default)]
    pub rating_2: Option<String>,
    #[serde(rename = "school_name_3", default)]
    pub school_name_3: Option<String>,
    #[serde(rename = "Grades_3", default)]
    pub grades_3: Option<String>,
    #[serde(rename = "Rank_3", default)]
    pub rank_3: Option<String>,
    #[serde(rename = "Rating_3", default)]
    pub rating_3: Option<String>,
}

impl RawListing {
    pub fn policy_texts(&self) -> [Option<&str>; 4] {
        [
            self.dogs_policy.as_deref(),
            self.cats_policy.as_deref(),
            self.large_dogs_policy.as_deref(),
            self.small_dogs_policy.as_deref(),
        ]
    }

    /// The three school slots in order. Empty slots come back as `School::default()`.
    pub fn schools(&self) -> [School; MAX_SCHOOLS] {
        [
            School {
                name: self.school_name_1.clone(),
                grades: self.grades_1.clone(),
                rank: self.rank_1.clone(),
                rating: self.rating_1.clone(),
            },
            School {
                name: self.school_name_2.clone(),
                grades: self.grades_2.clone(),
                rank: self.rank_2.clone(),
                rating: self.rating_2.clone(),
            },
            School {
                name: self.school_name_3.clone(),
                grades: self.grades_3.clone(),
                rank: self.rank_3.clone(),
                rating: self.rating_3.clone(),
            },
        ]
    }

    pub fn set_schools(&mut self, schools: [School; MAX_SCHOOLS]) {
        let [first, second, third] = schools;
        self.school_name_1 = first.name;
        self.grades_1 = first.grades;
        self.rank_1 = first.rank;
        self.rating_1 = first.rating;
        self.school_name_2 = second.name;
        self.grades_2 = second.grades;
        self.rank_2 = second.rank;
        self.rating_2 = second.rating;
        self.school_name_3 = third.name;
        self.grades_3 = third.grades;
        self.rank_3 = third.rank;
        self.rating_3 = third.rating;
    }
}

/// Listings carry at most this many nearby schools.
pub const MAX_SCHOOLS: usize = 3;

/// One nearby school as shown on the listing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct School {
    pub name: Option<String>,
    pub grades: Option<String>,
    pub rank: Option<String>,
    pub rating: Option<String>,
}

impl School {
    pub fn get(&self, field: SchoolField) -> Option<&str> {
        match field {
            SchoolField::Name => self.name.as_deref(),
            SchoolField::Grades => self.grades.as_deref(),
            SchoolField::Rank => self.rank.as_deref(),
            SchoolField::Rating => self.rating.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        SchoolField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchoolField {
    Name,
    Grades,
    Rank,
    Rating,
}

impl SchoolField {
    pub const ALL: [SchoolField; 4] = [
        SchoolField::Name,
        SchoolField::Grades,
        SchoolField::Rank,
        SchoolField::Rating,
    ];

    /// Catalog column prefix; the slot number follows after `_`.
    pub fn column_prefix(&self) -> &'static str {
        match self {
            SchoolField::Name => "SCHOOL_NAME",
            SchoolField::Grades => "GRADES",
            SchoolField::Rank => "RANK",
            SchoolField::Rating => "RATING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetPolicy {
    Allowed,
    NotAllowed,
    Unknown,
}

impl PetPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetPolicy::Allowed => "Allowed",
            PetPolicy::NotAllowed => "Not Allowed",
            PetPolicy::Unknown => "N/A",
        }
    }

    pub fn from_label(label: &str) -> PetPolicy {
        match label {
            "Allowed" => PetPolicy::Allowed,
            "Not Allowed" => PetPolicy::NotAllowed,
            _ => PetPolicy::Unknown,
        }
    }
}

impl fmt::Display for PetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing after cleaning. Built once by the normalizer and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalListing {
    pub address: String,
    pub apartment_name: Option<String>,
    /// Rent text as scraped, kept for display.
    pub rent: Option<String>,
    pub average_rent: Option<f64>,
    /// Five ASCII digits or [`UNKNOWN_ZIP`].
    pub zip_code: String,
    pub city: Option<String>,
    pub region: Region,
    pub pet_policy: PetPolicy,
    pub features: Option<String>,
    pub appliances: Option<String>,
    /// Slot order is preserved; unused slots are empty.
    pub schools: [School; MAX_SCHOOLS],
}
