//! HTTP API: the Overview, Categories and Products screens as JSON endpoints.

pub mod app;
pub mod config;
pub mod middleware;
