// Library for tests to access modules

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod resampler;
pub mod routes;
pub mod source;
pub mod store;
pub mod version;
pub mod worker;
