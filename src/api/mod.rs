//! Workbook editor HTTP service
//!
//! Serves the browser grid and one REST endpoint per editor action.
//! Run with `workbook-editor serve` or `workbook-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
