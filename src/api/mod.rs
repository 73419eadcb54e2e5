//! API Module
//!
//! HTTP handlers, routing, and the bearer-token gate for the library
//! REST API.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
