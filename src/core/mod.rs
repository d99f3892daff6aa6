//! Core: error taxonomy and script fixture configuration.

pub mod config;
pub mod errors;
