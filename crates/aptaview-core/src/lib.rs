//! Core domain of the aptaview workspace: the SELEX experiment data
//! model and every pure transformation over it.
//!
//! This crate owns the wire models (reports, cluster analyses,
//! structure predictions), the derived pool and cluster tables, the
//! chart transforms, and the gateway traits that the API crate
//! implements. It performs no I/O.

pub mod chart;
pub mod cluster;
pub mod error;
pub mod experiment;
pub mod pool;
pub mod prediction;
pub mod report;
pub mod settings;

// Re-export the common error type
pub use error::{AptaError, Result};
