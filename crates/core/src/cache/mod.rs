//! SQLite-backed store of named cache generations.
//!
//! This module provides a persistent, content-addressed response cache using
//! SQLite with async access via tokio-rusqlite. It supports:
//!
//! - Named generations, created on open and dropped wholesale on delete
//! - Entries keyed by SHA-256 of method and URL
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod generations;
pub mod hash;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use store::CacheStore;
