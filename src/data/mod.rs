pub mod cache;
pub mod fetcher;
pub mod resample;
pub mod throttle;
pub mod trends;
pub mod types;
