//! Request handlers

pub mod analytics;
pub mod ask;
pub mod status;
