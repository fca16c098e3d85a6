//! Tower middleware for the [`crate::HyperClient`] transport.
//!
//! Layers wrap the transport itself, below the hook pipeline: they see every
//! exchange after headers have been merged and hooks have run. Use hooks for
//! per-instance request shaping and layers for concerns shared by every
//! `Fetcher` that uses the same transport.
//!
//! ```ignore
//! use fetcher::{HyperClient, middleware::LoggingLayer};
//!
//! let client = HyperClient::builder().layer(LoggingLayer::new()).build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
