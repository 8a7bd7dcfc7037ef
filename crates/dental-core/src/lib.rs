//! Dental Core Library
//!
//! Error taxonomy, storage ports, and the two stores that sit between the
//! request handlers and persistence: recommendations and API settings.

// Re-export pure types from dental-types
pub use dental_types::*;

pub mod error;
pub mod memory;
pub mod ports;
pub mod services;

pub use error::{Result, StoreError};
pub use memory::MemoryRepository;
pub use ports::{RecommendationRepository, SettingsRepository};
pub use services::{KeyedSettingsStore, RecordStore};
