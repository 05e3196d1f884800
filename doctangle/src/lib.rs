//! Keeps compiled documentation examples in sync with prose documentation.
//!
//! Markdown documents carry fenced code samples; each tagged sample is
//! materialized as a standalone source file and registered exactly once in the
//! build manifest, so documentation examples stay continuously compilable.

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod sync;
pub mod target;

pub use config::{Config, NamingScope};
pub use error::SyncError;
pub use sync::{SyncReport, check, sync};
