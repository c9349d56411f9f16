//! # Circle API Server
//!
//! Actix-web application: configuration, shared state, the token guard and
//! the route table. The binary in `main.rs` only wires these together.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use handlers::configure_routes;
pub use state::AppState;
