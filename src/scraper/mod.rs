mod listing_page;
mod scraper_error;

pub use listing_page::parse_listing_page;
pub use scraper_error::ScraperError;
