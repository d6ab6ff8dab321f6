//! Cache module for storing downloaded menu files on disk
//!
//! This module provides a cache manager that persists each fetched CSV body
//! under a deterministic key. Entries have no expiry; writes go through a
//! temporary file so an interrupted download never becomes a valid entry.

mod manager;

pub use manager::{CacheManager, CacheWriter};
