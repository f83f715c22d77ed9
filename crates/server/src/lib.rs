//! HTTP surface of the media catalog: axum router, handlers, error mapping,
//! metrics, OpenAPI document and process startup.

pub mod errors;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::{load_config, run, run_with_config};
pub use state::AppState;
