//! Core types and shared functionality for pantry.
//!
//! This crate provides:
//! - Cache storage with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStorage, StoredResponse};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
