pub mod config;
pub mod filter;
pub mod geocode;
pub mod map_sync;
pub mod model;
pub mod persist;
pub mod photo;
pub mod report;
pub mod store;
pub mod view;

#[cfg(test)]
mod flow_test;
