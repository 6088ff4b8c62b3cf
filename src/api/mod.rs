//! HTTP API for the task store.
//!
//! - `routes`: application state, router assembly and the server loop
//! - `tasks`: task CRUD endpoints
//! - `error`: error kinds and their HTTP mapping

mod error;
pub mod routes;
mod tasks;

pub use error::ApiError;
pub use routes::{router, serve, AppState};
