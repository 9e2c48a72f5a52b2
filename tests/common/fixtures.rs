//! Test fixture helpers for stylesheets and the resources they reference

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Ten bytes starting with the PNG signature
pub const TINY_PNG: &[u8; 10] = b"\x89PNG\r\n\x1a\n\x00\x01";

/// A workspace holding a stylesheet and its resources
pub struct StyleFixture {
    /// Keeps the directory alive
    pub dir: TempDir,
    /// Input stylesheet
    pub input: PathBuf,
    /// Output path (not created)
    pub output: PathBuf,
}

impl StyleFixture {
    /// Create `style.css` with `css` in a fresh directory
    pub fn new(css: &str) -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let input = dir.path().join("style.css");
        let output = dir.path().join("style.out.css");
        fs::write(&input, css)?;
        Ok(Self { dir, input, output })
    }

    /// Write a resource relative to the stylesheet's directory
    pub fn resource(&self, relative: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Directory containing the stylesheet
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Output contents as text
    pub fn output_text(&self) -> anyhow::Result<String> {
        Ok(fs::read_to_string(&self.output)?)
    }
}
