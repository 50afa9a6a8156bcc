pub mod civic;
pub mod listings;

pub use civic::{load_facilities, load_incidents};
pub use listings::{load_listing_pages, load_raw_listings};
