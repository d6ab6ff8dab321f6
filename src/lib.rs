//! Lunch CLI Library
//!
//! This module exposes the configuration, cache, menu parsing and CLI modules
//! for use by the binary and integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod ui;
