//! Core types and shared functionality for shellcache.
//!
//! This crate provides:
//! - Generation-based response cache with a SQLite backend
//! - Request and response value types
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod http;

pub use cache::{CacheDb, CacheStore};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use http::{Method, Request, RequestMode, Response};
