//! # medvisit-server
//!
//! HTTP server for the MedVisit visit-tracking system: axum router and
//! handlers over the access engine, configuration loading, and tracing
//! initialization.

pub mod config;
pub mod handlers;
pub mod observability;
pub mod server;
pub mod state;
pub mod visits;

pub use config::AppConfig;
pub use server::{MedvisitServer, ServerBuilder, build_app};
pub use state::AppState;
pub use visits::VisitService;
