//! Dental Types - Pure type definitions
//!
//! This crate contains only data types shared by the storage core and the
//! HTTP server, with no async runtime dependencies.

pub mod api;
pub mod recommendation;
pub mod settings;

pub use api::*;
pub use recommendation::*;
pub use settings::*;
