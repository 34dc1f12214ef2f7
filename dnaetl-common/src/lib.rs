//! # DNA ETL Common Library
//!
//! Shared code for the DNA ETL pipeline including:
//! - Error taxonomy (structural, semantic, malformed data)
//! - Configuration loading
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod time;

pub use config::{FilterConfig, LoggingConfig, TomlConfig};
pub use error::{Error, Result};
