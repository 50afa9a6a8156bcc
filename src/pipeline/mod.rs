pub mod facilities;
pub mod filter;
pub mod merger;
pub mod normalize;
pub mod safety;

pub use facilities::{aggregate_facilities, FacilityCounts};
pub use filter::filter_catalog;
pub use merger::build_catalog;
pub use normalize::normalize_listings;
pub use safety::{IncidentPresence, SafetyTable};
