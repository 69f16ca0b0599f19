//! Innsight Server - REST API and CLI around the analytics core
//!
//! Wires the pipeline and answering engine into process-wide state built once
//! at startup, then exposes it over axum routes and one-shot CLI commands.

pub mod commands;
pub mod config;
pub mod history;
pub mod server;
pub mod startup;
