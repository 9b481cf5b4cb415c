pub mod bundle;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod parallel;
pub mod reference;
