// src/pipeline/normalize.rs

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::domain::listing::{CanonicalListing, PetPolicy, RawListing, School, UNKNOWN_ZIP};
use crate::domain::logic::{Rule, RuleChain};

const ZIP_LEN: usize = 5;

/// Cleans every raw listing, dropping the ones without an address.
pub fn normalize_listings(raw: Vec<RawListing>, config: &PipelineConfig) -> Vec<CanonicalListing> {
    let total = raw.len();
    let pet_rules = pet_policy_rules();

    let listings: Vec<CanonicalListing> = raw
        .iter()
        .filter_map(|r| normalize_listing(r, config, &pet_rules))
        .collect();

    info!(
        total,
        kept = listings.len(),
        dropped = total - listings.len(),
        "Normalized raw listings"
    );
    listings
}

/// Cleans one raw listing. Returns `None` if it has no address.
pub fn normalize_listing(
    raw: &RawListing,
    config: &PipelineConfig,
    pet_rules: &RuleChain<RawListing, PetPolicy>,
) -> Option<CanonicalListing> {
    let Some(address) = raw.address.as_deref().map(str::trim).filter(|a| !a.is_empty()) else {
        debug!(name = ?raw.apartment_name, "Dropping listing without address");
        return None;
    };

    let zip_code = extract_zip(address);
    let region = config.regions.classify(&zip_code);

    Some(CanonicalListing {
        address: address.to_string(),
        apartment_name: non_empty(raw.apartment_name.as_deref()),
        rent: non_empty(raw.rent.as_deref()),
        average_rent: raw.rent.as_deref().and_then(parse_average_rent),
        city: extract_city(address),
        zip_code,
        region,
        pet_policy: pet_rules.evaluate(raw),
        features: non_empty(raw.features.as_deref()),
        appliances: non_empty(raw.appliances.as_deref()),
        schools: raw.schools().map(|school| School {
            name: non_empty(school.name.as_deref()),
            grades: non_empty(school.grades.as_deref()),
            rank: non_empty(school.rank.as_deref()),
            rating: non_empty(school.rating.as_deref()),
        }),
    })
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Trailing five digits of the address, or `"unknown"`.
pub fn extract_zip(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < ZIP_LEN {
        return UNKNOWN_ZIP.to_string();
    }

    let suffix: String = chars[chars.len() - ZIP_LEN..].iter().collect();
    if suffix.chars().all(|c| c.is_ascii_digit()) {
        suffix
    } else {
        UNKNOWN_ZIP.to_string()
    }
}

/// Second comma-separated token of the address, trimmed.
pub fn extract_city(address: &str) -> Option<String> {
    address
        .split(',')
        .nth(1)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Turns rent text like `"$2,000-$2,500/mo"` into a number.
/// A two-sided range yields its midpoint. Anything unparseable yields `None`.
pub fn parse_average_rent(rent: &str) -> Option<f64> {
    let cleaned = rent
        .replace('$', "")
        .replace("/mo", "")
        .replace(',', "")
        .replace('+', "");

    let parts: Vec<&str> = cleaned.split('-').map(str::trim).collect();
    match parts.as_slice() {
        [single] => single.parse::<i64>().ok().map(|v| v as f64),
        [low, high] => {
            let low = low.parse::<i64>().ok()?;
            let high = high.parse::<i64>().ok()?;
            // i128 holds the sum of any two i64 bounds
            Some((i128::from(low) + i128::from(high)) as f64 / 2.0)
        }
        _ => None,
    }
}

fn any_policy_contains(raw: &RawListing, needle: &str) -> bool {
    raw.policy_texts().iter().flatten().any(|t| t.contains(needle))
}

fn flag_contains(raw: &RawListing, needle: &str) -> bool {
    raw.pets_allowed.as_deref().is_some_and(|f| f.contains(needle))
}

fn policy_says_allowed(raw: &RawListing) -> bool {
    any_policy_contains(raw, "Allowed")
}

fn flag_says_yes(raw: &RawListing) -> bool {
    flag_contains(raw, "Yes")
}

fn policy_says_not_allowed(raw: &RawListing) -> bool {
    any_policy_contains(raw, "Not allowed")
}

fn flag_says_no(raw: &RawListing) -> bool {
    flag_contains(raw, "No")
}

/// Pet evidence in precedence order. A specific allowance (e.g. "Small dogs
/// Allowed") outranks a blanket denial anywhere else on the page.
pub fn pet_policy_rules() -> RuleChain<RawListing, PetPolicy> {
    RuleChain::new(
        vec![
            (policy_says_allowed as Rule<RawListing>, PetPolicy::Allowed),
            (flag_says_yes as Rule<RawListing>, PetPolicy::Allowed),
            (policy_says_not_allowed as Rule<RawListing>, PetPolicy::NotAllowed),
            (flag_says_no as Rule<RawListing>, PetPolicy::NotAllowed),
        ],
        PetPolicy::Unknown,
    )
}
