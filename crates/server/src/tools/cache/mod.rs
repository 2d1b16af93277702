//! Cache-related MCP tools.

pub mod inventory;

pub use inventory::inventory_impl;
