//! Per-run conversion summary

use console::{style, Emoji};
use serde::Serialize;
use std::path::Path;

use crate::converter::LineOutcome;
use crate::fmt::{format_bytes, CHECKMARK, INFO, WARNING};

/// Counts collected while converting a stylesheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// Lines read (and written)
    pub lines: usize,
    /// Lines carrying a `url(...)` reference
    pub references: usize,
    /// References replaced by data URIs
    pub converted: usize,
    /// References left alone because the resource exceeds the threshold
    pub too_large: usize,
    /// References left alone because the extension has no MIME type
    pub unsupported: usize,
    /// Total size of inlined resources before encoding
    pub inlined_bytes: u64,
}

impl ConversionReport {
    /// Account for one converted line
    pub fn record(&mut self, outcome: &LineOutcome) {
        match outcome {
            LineOutcome::Unchanged => {}
            LineOutcome::Converted { bytes, .. } => {
                self.references += 1;
                self.converted += 1;
                self.inlined_bytes += *bytes as u64;
            }
            LineOutcome::TooLarge { .. } => {
                self.references += 1;
                self.too_large += 1;
            }
            LineOutcome::Unsupported { .. } => {
                self.references += 1;
                self.unsupported += 1;
            }
        }
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Print a human readable summary of a finished run
pub fn print_summary(report: &ConversionReport, output: &Path, plain: bool) {
    let icon = |emoji: Emoji<'_, '_>| {
        if plain {
            emoji.1.to_string()
        } else {
            emoji.to_string()
        }
    };

    println!(
        "{} Wrote {} ({} lines)",
        icon(CHECKMARK),
        style(output.display()).bold(),
        report.lines
    );
    println!(
        "  {} {} of {} reference(s) inlined, {}",
        icon(INFO),
        style(report.converted).green(),
        report.references,
        format_bytes(report.inlined_bytes)
    );

    if report.too_large > 0 {
        println!(
            "  {} {} over the size threshold",
            icon(WARNING),
            style(report.too_large).yellow()
        );
    }
    if report.unsupported > 0 {
        println!(
            "  {} {} with an unsupported extension",
            icon(WARNING),
            style(report.unsupported).yellow()
        );
    }
}
