//! Core domain types and logic.

pub mod stock;
pub mod dataset;
pub mod prepare;
pub mod signal;
pub mod metrics;
pub mod decision;
pub mod engine;
pub mod cache;
pub mod config_validation;
pub mod error;
