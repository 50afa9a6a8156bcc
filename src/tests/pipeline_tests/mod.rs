mod end_to_end_tests;
mod filter_tests;
mod persistence_tests;
