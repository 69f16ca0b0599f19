//! Innsight Core - Hotel Booking Analytics and Grounded Question Answering
//!
//! Transforms raw booking records into an immutable analytics snapshot,
//! renders the snapshot into retrievable text passages, and answers natural
//! language questions grounded in passages retrieved from a persisted
//! semantic index.

pub mod analytics;
pub mod answer;
pub mod dataset;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod months;
pub mod normalize;
pub mod passages;
pub mod pipeline;

pub use error::{Error, Result};
