//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration file management (path, init)
//! - [`download`] - Download every tile of an area
//! - [`plan`] - Pre-flight summary without network access
//! - [`stats`] - File count and size of a tile directory

pub mod common;
pub mod config;
pub mod download;
pub mod plan;
pub mod stats;
