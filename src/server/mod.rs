//! HTTP server exposing the invoice list view and the mutation actions

pub mod builder;
pub mod handlers;

pub use builder::ServerBuilder;
pub use handlers::AppState;
