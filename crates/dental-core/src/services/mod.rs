//! Store services

pub mod records;
pub mod settings;

pub use records::RecordStore;
pub use settings::KeyedSettingsStore;
