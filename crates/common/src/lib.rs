//! grafsync Common Library
//!
//! Shared types, errors, configuration and the transport seam used by the
//! reconciler and the command line tool.

pub mod config;
pub mod error;
pub mod spec_file;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::ConnectionConfig;
pub use error::{Error, Operation, Result};
pub use transport::{ApiResponse, Method, Transport};
pub use types::*;

/// grafsync version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
