//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so running without a file is
//! the same as running with an empty one.
//!
//! # Example
//!
//! ```no_run
//! use zfrontier_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Feed stops below offset {}", config.crawler.min_offset);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, CommentsConfig, Config, CrawlerConfig, FeedConfig, OutputConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
