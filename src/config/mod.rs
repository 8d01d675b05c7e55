//! Configuration module for Email-Census
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every section has defaults, so running without a file
//! is equivalent to loading an empty one.
//!
//! # Example
//!
//! ```no_run
//! use email_census::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("census.toml")).unwrap();
//! println!("Request timeout: {}s", config.http.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
