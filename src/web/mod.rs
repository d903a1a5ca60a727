//! HTTP surface of the standings service.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod standings;
pub mod status;

pub use routes::*;
