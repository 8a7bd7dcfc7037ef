//! HTTP handlers

pub mod health;
pub mod recommendations;
pub mod settings;

pub use health::health;
