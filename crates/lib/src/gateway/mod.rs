//! Gateway: webhook ingestion and health endpoints.
//!
//! One HTTP port serves `POST /webhook` (signature-verified event batches)
//! and `GET /` (health probe). All per-event work happens in `dispatch`.

mod server;

pub use server::{run_gateway, AppState};
