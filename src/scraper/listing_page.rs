// listing_page.rs
use ::scraper::{ElementRef, Html, Selector};

use crate::domain::listing::{RawListing, School, MAX_SCHOOLS};
use crate::scraper::ScraperError;

const NOT_AVAILABLE: &str = "N/A";

// Building pages come in two layouts; selectors are tried in order.
const NAME_SELECTORS: [&str; 2] = [
    r#"h1[data-test-id="bdp-building-title"]"#,
    "h1.Text-c11n-8-100-1__sc-aiai24-0.jbRdkh",
];
const ADDRESS_SELECTORS: [&str; 2] = [
    r#"h2[data-test-id="bdp-building-address"]"#,
    "h1.Text-c11n-8-100-1__sc-aiai24-0.jbRdkh",
];
const RENT_SELECTORS: [&str; 2] = [
    r#"span[data-test-id="base-rent"]"#,
    "button.TriggerText-c11n-8-100-1__sc-d96jze-0.BpPaS",
];
const FEATURE_SELECTORS: [&str; 2] = [
    "div.AtAGlanceFactsHollywood__StyledContainer-sc-34d077-0.jevfwQ",
    "div.hdp__sc-1nwbd1e-0.dcGsBQ",
];

// Nearby schools, ranked layout
const RANKED_SCHOOL_ITEMS: &str =
    "ul.List-c11n-8-101-4__sc-1smrmqp-0.qjARs li.ListItem-c11n-8-101-4__sc-13rwu5a-0.sc-eVZGIO.knfXza.jZa-dWq";
const RANKED_SCHOOL_NAME: &str = "a.StyledTextButton-c11n-8-101-4__sc-1nwmfqo-0.fvRKOm";
const RANKED_SCHOOL_GRADES: &str =
    "div.Spacer-c11n-8-101-4__sc-17suqs2-0.dVGeMt span.Text-c11n-8-101-4__sc-aiai24-0.jyAa-dJ";
const RANKED_SCHOOL_RANK: &str = "span.Text-c11n-8-101-4__sc-aiai24-0.kcINhd";

// Nearby schools, GreatSchools rating layout
const RATING_HEADING: &str = "GreatSchools rating";
const RATED_SCHOOL_CONTAINER: &str = "div.Spacer-c11n-8-100-1__sc-17suqs2-0.sc-jRWcDx.dQqFYn";
const RATED_SCHOOL_ITEMS: &str = "li.ListItem-c11n-8-100-1__sc-13rwu5a-0.sc-fiDBSu.sjBJu.ekjldB";
const RATED_SCHOOL_NAME: &str = "a.StyledTextButton-c11n-8-100-1__sc-1nwmfqo-0.hcHpXi";
const RATED_SCHOOL_GRADES: &str = "span.Text-c11n-8-100-1__sc-aiai24-0.kbVOjR";
const RATED_SCHOOL_RATING: &str = "span.Text-c11n-8-100-1__sc-aiai24-0.bENqXR";

const DOGS_POLICY: &str = "building-null-dogs-policy";
const CATS_POLICY: &str = "building-null-cats-policy";
const LARGE_DOGS_POLICY: &str = "building-large-dogs-policy";
const SMALL_DOGS_POLICY: &str = "building-small-dogs-policy";
const APPLIANCES: &str = "building-amenity-appliances";

/// Extracts a raw listing from a saved building detail page.
///
/// Fields that cannot be found come back as `"N/A"`, except the address,
/// which stays absent so the normalizer drops the listing.
pub fn parse_listing_page(html: &str) -> Result<RawListing, ScraperError> {
    let document = Html::parse_document(html);

    let apartment_name = first_text(&document, &NAME_SELECTORS)?;
    let address = first_text(&document, &ADDRESS_SELECTORS)?;
    if apartment_name.is_none() && address.is_none() {
        return Err(ScraperError::UnexpectedShape(
            "no building title or address".to_string(),
        ));
    }

    let mut listing = RawListing {
        apartment_name: Some(apartment_name.unwrap_or_else(|| NOT_AVAILABLE.to_string())),
        address,
        rent: Some(or_na(first_text(&document, &RENT_SELECTORS)?)),
        features: Some(or_na(first_text(&document, &FEATURE_SELECTORS)?)),
        appliances: Some(or_na(list_items(&document, APPLIANCES)?)),
        dogs_policy: Some(or_na(list_items(&document, DOGS_POLICY)?)),
        cats_policy: Some(or_na(list_items(&document, CATS_POLICY)?)),
        large_dogs_policy: Some(or_na(list_items(&document, LARGE_DOGS_POLICY)?)),
        small_dogs_policy: Some(or_na(list_items(&document, SMALL_DOGS_POLICY)?)),
        pets_allowed: Some(pets_allowed(&document)?),
        ..Default::default()
    };
    listing.set_schools(schools(&document)?);
    Ok(listing)
}

/// Up to three nearby schools. When both layouts are present the rating
/// layout overwrites name and grades slot by slot and the rank is kept.
fn schools(document: &Html) -> Result<[School; MAX_SCHOOLS], ScraperError> {
    let mut slots: [School; MAX_SCHOOLS] = Default::default();

    for (slot, school) in slots.iter_mut().zip(ranked_schools(document)?) {
        *slot = school;
    }
    for (slot, school) in slots.iter_mut().zip(rated_schools(document)?) {
        slot.name = school.name;
        slot.grades = school.grades;
        slot.rating = school.rating;
    }
    Ok(slots)
}

fn ranked_schools(document: &Html) -> Result<Vec<School>, ScraperError> {
    let item_sel = selector(RANKED_SCHOOL_ITEMS)?;
    let name_sel = selector(RANKED_SCHOOL_NAME)?;
    let grades_sel = selector(RANKED_SCHOOL_GRADES)?;
    let rank_sel = selector(RANKED_SCHOOL_RANK)?;

    Ok(document
        .select(&item_sel)
        .take(MAX_SCHOOLS)
        .map(|item| School {
            name: Some(child_text(item, &name_sel)),
            grades: Some(child_text(item, &grades_sel)),
            rank: Some(child_text(item, &rank_sel)),
            rating: None,
        })
        .collect())
}

fn rated_schools(document: &Html) -> Result<Vec<School>, ScraperError> {
    let Some(container) = rating_container(document)? else {
        return Ok(Vec::new());
    };
    let item_sel = selector(RATED_SCHOOL_ITEMS)?;
    let name_sel = selector(RATED_SCHOOL_NAME)?;
    let grades_sel = selector(RATED_SCHOOL_GRADES)?;
    let rating_sel = selector(RATED_SCHOOL_RATING)?;

    Ok(container
        .select(&item_sel)
        .take(MAX_SCHOOLS)
        .map(|item| School {
            name: Some(child_text(item, &name_sel)),
            grades: Some(child_text(item, &grades_sel)),
            rank: None,
            rating: Some(child_text(item, &rating_sel)),
        })
        .collect())
}

/// The first school container that follows the "GreatSchools rating" heading
/// in document order.
fn rating_container(document: &Html) -> Result<Option<ElementRef<'_>>, ScraperError> {
    let heading_sel = selector("h5")?;
    let container_sel = selector(RATED_SCHOOL_CONTAINER)?;

    let mut past_heading = false;
    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if !past_heading {
            past_heading =
                heading_sel.matches(&element) && element_text(element) == RATING_HEADING;
        } else if container_sel.matches(&element) {
            return Ok(Some(element));
        }
    }
    Ok(None)
}

/// Text of the first match under `element`, or `"N/A"`.
fn child_text(element: ElementRef<'_>, sel: &Selector) -> String {
    element
        .select(sel)
        .map(element_text)
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn or_na(s: Option<String>) -> String {
    s.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(e.to_string()))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first non-empty element matched by any selector.
fn first_text(document: &Html, selectors: &[&str]) -> Result<Option<String>, ScraperError> {
    for css in selectors {
        let sel = selector(css)?;
        if let Some(text) = document
            .select(&sel)
            .map(element_text)
            .find(|t| !t.is_empty())
        {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// Item texts under a `data-test-id` block, joined with ", ".
fn list_items(document: &Html, test_id: &str) -> Result<Option<String>, ScraperError> {
    let sel = selector(&format!(r#"div[data-test-id="{test_id}"] li"#))?;
    let items: Vec<String> = document
        .select(&sel)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect();

    Ok((!items.is_empty()).then(|| items.join(", ")))
}

/// "Yes"/"No" from the "Pets allowed" fact under the Management heading.
fn pets_allowed(document: &Html) -> Result<String, ScraperError> {
    let category_sel = selector(r#"div[data-testid="fact-category"]"#)?;
    let heading_sel = selector("h6")?;
    let item_sel = selector("li")?;

    for category in document.select(&category_sel) {
        let is_management = category
            .select(&heading_sel)
            .any(|h| element_text(h) == "Management");
        if !is_management {
            continue;
        }

        for item in category.select(&item_sel) {
            let text = element_text(item);
            if text.contains("Pets allowed") {
                let answer = if text.contains("Yes") { "Yes" } else { "No" };
                return Ok(answer.to_string());
            }
        }
    }
    Ok(NOT_AVAILABLE.to_string())
}
