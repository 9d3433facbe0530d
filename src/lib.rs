pub mod api;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod geo;
pub mod limits;
pub mod model;
pub mod observability;
pub mod text;
