//! Result formatting and display
//!
//! This module provides formatters for traversal results:
//! - JSON output for content trees and path lists
//! - Console output with colors for finished path lists
//! - Live console or JSON-lines output for listing events
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `json` - JSON output
//! - `paths` - Buffered formatter for complete path lists
//! - `streaming` - Streaming formatter for listing events

mod config;
mod json;
mod paths;
mod streaming;

// Re-export public types and functions
pub use config::OutputConfig;
pub use json::{print_json, write_json_line};
pub use paths::{PathPrinter, is_dir_path};
pub use streaming::EventPrinter;
