//! HTTP gateways to the aptaview backend.
//!
//! Each gateway implements one of the core traits over the shared
//! [`Backend`] connection; the application layer only sees the traits.

pub mod backend;
pub mod clusters;
pub mod experiments;
pub mod predictions;

pub use crate::backend::Backend;
pub use crate::clusters::HttpClustersGateway;
pub use crate::experiments::HttpExperimentsGateway;
pub use crate::predictions::HttpPredictionsGateway;
