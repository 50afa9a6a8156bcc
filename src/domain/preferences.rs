use serde::Deserialize;

use crate::domain::catalog::{COL_AVERAGE_RENT, COL_BORO, COL_PET_POLICY, COL_SAFETY_LEVEL};
use crate::domain::listing::PetPolicy;
use crate::domain::query::{Condition, Operand, Query};
use crate::domain::region::Region;
use crate::errors::{PipelineError, PipelineResult};

/// Answer meaning "no constraint" for any single-choice question.
pub const NO_PREFERENCE: &str = "Not to matter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PriceRange {
    #[serde(rename = "< 2000")]
    Under2000,
    #[serde(rename = "2000-2800")]
    From2000To2800,
    #[serde(rename = "2800-3600")]
    From2800To3600,
    #[serde(rename = "3600-4400")]
    From3600To4400,
    #[serde(rename = "> 4400")]
    Over4400,
}

impl PriceRange {
    fn condition(&self) -> Condition {
        let between = |lo: f64, hi: f64| Condition::new("between", [Operand::Number(lo), Operand::Number(hi)]);
        match self {
            PriceRange::Under2000 => Condition::new("<", [Operand::Number(2000.0)]),
            PriceRange::From2000To2800 => between(2000.0, 2800.0),
            PriceRange::From2800To3600 => between(2800.0, 3600.0),
            PriceRange::From3600To4400 => between(3600.0, 4400.0),
            PriceRange::Over4400 => Condition::new(">", [Operand::Number(4400.0)]),
        }
    }
}

/// What a user wants from an apartment, as collected up front.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    /// `true` requires pets allowed, `false` requires no pets.
    #[serde(default)]
    pub pets: Option<bool>,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub safety_level: Option<String>,
}

impl Preferences {
    pub fn to_query(&self) -> PipelineResult<Query> {
        let borough = match chosen(&self.borough) {
            None => None,
            Some(name) => {
                let region = Region::from_name(name);
                if region == Region::Unknown {
                    return Err(PipelineError::MalformedCondition {
                        column: COL_BORO.to_string(),
                        reason: format!("unknown borough '{name}'"),
                    });
                }
                Some(Condition::new("==", [Operand::Text(region.as_str().to_string())]))
            }
        };

        let pets = self.pets.map(|required| {
            let policy = if required { PetPolicy::Allowed } else { PetPolicy::NotAllowed };
            Condition::new("==", [Operand::Text(policy.as_str().to_string())])
        });

        let safety = chosen(&self.safety_level)
            .map(|label| Condition::new("==", [Operand::Text(label.to_string())]));

        let facilities = self
            .facilities
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty() && *f != NO_PREFERENCE);

        Ok(Query::from_conditions([
            (COL_BORO, borough),
            (COL_AVERAGE_RENT, self.price_range.map(|r| r.condition())),
            (COL_PET_POLICY, pets),
            (COL_SAFETY_LEVEL, safety),
        ])?
        .with_facilities(facilities))
    }
}

fn chosen(answer: &Option<String>) -> Option<&str> {
    answer
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty() && *a != NO_PREFERENCE)
}
