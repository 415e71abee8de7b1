//! SQLite-backed cache of named stores holding response snapshots.
//!
//! This module provides the agent's persistent view of cache storage: a set
//! of named stores (one per cache generation), each mapping request keys to
//! stored responses. Backed by SQLite with async access via tokio-rusqlite.
//! It supports:
//!
//! - Request-addressed storage using SHA-256 hashing over method and URL
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Store deletion that cascades to contained entries

pub mod connection;
pub mod entries;
pub mod key;
pub mod migrations;
pub mod stores;

pub use crate::Error;

pub use connection::CacheStorage;
pub use entries::StoredResponse;
