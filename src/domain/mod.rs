pub mod catalog;
pub mod listing;
pub mod logic;
pub mod preferences;
pub mod query;
pub mod region;
pub mod sources;
