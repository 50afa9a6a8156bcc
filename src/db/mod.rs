pub mod catalog;
pub mod connection;

pub use catalog::{load_catalog, save_catalog};
pub use connection::{init_db, Database};
