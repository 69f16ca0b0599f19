//! REST API module

pub mod handlers;
pub mod routing;
pub mod server;
pub mod types;
