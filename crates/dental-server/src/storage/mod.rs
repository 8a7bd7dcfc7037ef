//! Storage layer
//!
//! Uses SQLite (embedded) for persistence. The in-memory backend lives in
//! `dental_core::MemoryRepository`.

pub mod db;

pub use db::Database;
