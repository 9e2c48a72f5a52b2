//! Command handlers for the css-datauri CLI

pub mod convert;

pub use convert::{cmd_convert, ConvertOptions};
