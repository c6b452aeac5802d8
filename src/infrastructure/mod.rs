// Infrastructure module - External dependencies and adapters
pub mod aws;
pub mod config;
pub mod logging;
