pub mod app;
pub mod error;
mod extract;
pub mod pagination;
mod routes;

pub use app::{router, run_server, AppState};
