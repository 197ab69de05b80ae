//! Browser-facing surface: router, handlers, and page composition.

pub mod pages;
pub mod server;

pub use server::{AppState, SharedState, build_router, build_state, start_server};
