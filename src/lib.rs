#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! css-datauri library
//!
//! Rewrites a stylesheet's `url(...)` references to small images as inline
//! base64 data URIs, cutting the number of requests a browser makes to render
//! a page. It can be used programmatically in addition to the CLI interface.
//!
//! # Basic Example
//!
//! Converting a single line:
//!
//! ```
//! use css_datauri::config::ConverterConfig;
//! use css_datauri::converter::StylesheetConverter;
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let dir = TempDir::new().unwrap();
//! fs::write(dir.path().join("dot.gif"), b"GIF89a").unwrap();
//!
//! let converter = StylesheetConverter::new(dir.path(), ConverterConfig::default());
//! let line = converter.convert_line("a { background: url(dot.gif); }\n").unwrap();
//! assert_eq!(line.text, "a { background: url(data:image/gif;base64,R0lGODlh); }\n");
//! ```
//!
//! # Converting a File
//!
//! ```
//! use css_datauri::config::ConverterConfig;
//! use css_datauri::converter;
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let dir = TempDir::new().unwrap();
//! let input = dir.path().join("style.css");
//! let output = dir.path().join("style.inline.css");
//! fs::write(dir.path().join("big.png"), vec![0u8; 4096]).unwrap();
//! fs::write(&input, "body { color: red; }\ndiv { background: url(big.png); }\n").unwrap();
//!
//! let report = converter::run(&input, &output, ConverterConfig::default()).unwrap();
//! assert_eq!(report.lines, 2);
//! assert_eq!(report.too_large, 1);
//! assert_eq!(fs::read_to_string(&input).unwrap(), fs::read_to_string(&output).unwrap());
//! ```

/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file and settings
pub mod config;
/// Line-oriented stylesheet conversion
pub mod converter;
/// Error types with contextual suggestions
pub mod error;
/// Resource fetching (local files and plain HTTP)
pub mod fetch;
/// Shared formatting utilities
pub mod fmt;
/// Conversion summaries
pub mod report;

pub use converter::{run, StylesheetConverter};
pub use error::ConvertError;
