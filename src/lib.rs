pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod pipeline;

// Typed row schemas, one module per CSV asset
pub mod datasets;

// Chart-facing compositions consumed by the rendering layer
pub mod views;
