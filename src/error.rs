//! Error types with contextual suggestions
//!
//! Two layers of errors exist:
//! - [`FetchError`]: retrieving the bytes behind a resource reference failed
//! - [`ConvertError`]: everything that can go wrong while converting a stylesheet
//!
//! Only [`ConvertError::SizeLimit`] and [`ConvertError::UnsupportedExtension`] are
//! recovered per line. Every other variant aborts the run.
//!
//! # Examples
//!
//! ```no_run
//! use css_datauri::config::ConverterConfig;
//! use css_datauri::converter;
//! use std::path::Path;
//!
//! match converter::run(Path::new("style.css"), Path::new("out.css"), ConverterConfig::default()) {
//!     Ok(report) => println!("Inlined {} references", report.converted),
//!     Err(e) => {
//!         eprintln!("Conversion failed: {}", e);
//!         std::process::exit(e.exit_code());
//!     }
//! }
//! ```

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to retrieve resource bytes
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP request could not be performed
    #[error("HTTP request to {url} failed")]
    Http {
        /// Requested address
        url: String,
        #[source]
        /// Transport error
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("HTTP request to {url} returned status {status}")]
    Status {
        /// Requested address
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// A local file could not be read
    #[error("cannot read {}", path.display())]
    Local {
        /// Resolved file path
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

/// Where in the input a malformed rule was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleLocation {
    /// 1-based line number, when known
    pub line: Option<usize>,
    /// 1-based byte column of the `url(` marker
    pub column: usize,
}

impl fmt::Display for RuleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}, column {}", line, self.column),
            None => write!(f, "column {}", self.column),
        }
    }
}

/// Stylesheet conversion errors
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Resource is larger than the inlining threshold
    #[error("resource is {size} bytes, over the {limit} byte inlining threshold")]
    SizeLimit {
        /// Resource size in bytes
        size: usize,
        /// Configured threshold in bytes
        limit: usize,
    },

    /// Reference extension has no MIME type
    #[error("unsupported resource extension: '{extension}'")]
    UnsupportedExtension {
        /// Extension including the leading dot, empty when there is none
        extension: String,
    },

    /// Resource bytes could not be retrieved
    #[error("failed to fetch resource '{reference}'")]
    Fetch {
        /// Reference text as written in the stylesheet
        reference: String,
        #[source]
        /// Underlying fetch failure
        source: FetchError,
    },

    /// `url(` without a matching `)`
    #[error("unterminated `url(` token at {location}")]
    MalformedRule {
        /// Position of the offending marker
        location: RuleLocation,
    },

    /// Explicitly requested configuration file is missing
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound {
        /// Path to config file
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Configuration values are unusable
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong
        message: String,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Build an [`ConvertError::Io`] with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the converter recovers from this error by emitting the line unchanged
    ///
    /// # Examples
    ///
    /// ```
    /// use css_datauri::error::ConvertError;
    ///
    /// let err = ConvertError::SizeLimit { size: 3000, limit: 2048 };
    /// assert!(err.is_recoverable());
    ///
    /// let err = ConvertError::InvalidConfig { message: "bad".to_string() };
    /// assert!(!err.is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SizeLimit { .. } | Self::UnsupportedExtension { .. }
        )
    }

    /// Get actionable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::SizeLimit { limit, .. } => Some(format!(
                "Raise the threshold with --max-size (currently {} bytes)",
                limit
            )),
            Self::UnsupportedExtension { .. } => Some(
                "Add the extension under [mime-types] in .css-datauri.toml".to_string(),
            ),
            Self::Fetch { source, .. } => match source {
                FetchError::Http { .. } | FetchError::Status { .. } => Some(
                    "Check that the address is reachable over plain http:// (https is not supported)"
                        .to_string(),
                ),
                FetchError::Local { path, .. } => Some(format!(
                    "Local references resolve against the stylesheet's directory; ensure {} exists and is readable",
                    path.display()
                )),
            },
            Self::MalformedRule { .. } => {
                Some("Close the `url(` token with `)` on the same line".to_string())
            }
            Self::ConfigNotFound { path, .. } => Some(format!(
                "Create {} or drop the --config option",
                path.display()
            )),
            Self::InvalidConfig { .. } => Some(
                "Use `max-size-bytes = <positive integer>` and `\".ext\" = \"type/subtype\"` entries"
                    .to_string(),
            ),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get appropriate exit code for this error, following sysexits.h conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use css_datauri::error::{ConvertError, RuleLocation};
    ///
    /// let err = ConvertError::MalformedRule {
    ///     location: RuleLocation { line: Some(3), column: 12 },
    /// };
    /// assert_eq!(err.exit_code(), 65); // EX_DATAERR
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SizeLimit { .. } => 1,
            Self::UnsupportedExtension { .. } => 1,
            Self::Fetch { source, .. } => match source {
                FetchError::Http { .. } => 69, // EX_UNAVAILABLE
                FetchError::Status { .. } => 69,
                FetchError::Local { .. } => 66, // EX_NOINPUT
            },
            Self::MalformedRule { .. } => 65, // EX_DATAERR
            Self::ConfigNotFound { .. } => 66,
            Self::InvalidConfig { .. } => 78, // EX_CONFIG
            Self::Io { .. } => 74,            // EX_IOERR
        }
    }
}

/// Renders an error report for the terminal
///
/// The first line is the top-level message, followed by one `caused by:` line
/// per underlying error. A `help:` line is added when a [`ConvertError`] sits
/// anywhere in the chain, so context added by callers does not hide it.
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Render `error` with its causes and, when known, a suggestion
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;
        use std::fmt::Write as _;

        let mut chain = error.chain();
        let mut output = String::new();
        if let Some(top) = chain.next() {
            let _ = writeln!(output, "{} {}", style("error:").red().bold(), top);
        }
        for cause in chain {
            let _ = writeln!(output, "  {} {}", style("caused by:").yellow(), cause);
        }

        if let Some(help) = Self::convert_error(error).and_then(ConvertError::suggestion) {
            let _ = write!(output, "\n{} {}\n", style("help:").cyan().bold(), help);
        }
        output
    }

    /// Exit status for `error`, 1 when no [`ConvertError`] is in the chain
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        Self::convert_error(error).map_or(1, ConvertError::exit_code)
    }

    fn convert_error(error: &anyhow::Error) -> Option<&ConvertError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<ConvertError>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::error::Error as _;

    fn local_fetch_error() -> ConvertError {
        ConvertError::Fetch {
            reference: "img/missing.png".to_string(),
            source: FetchError::Local {
                path: PathBuf::from("/styles/img/missing.png"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            },
        }
    }

    #[test]
    fn test_only_size_and_extension_errors_are_recoverable() {
        assert!(ConvertError::SizeLimit {
            size: 4096,
            limit: 2048
        }
        .is_recoverable());
        assert!(ConvertError::UnsupportedExtension {
            extension: ".bmp".to_string()
        }
        .is_recoverable());
        assert!(!local_fetch_error().is_recoverable());
        assert!(!ConvertError::MalformedRule {
            location: RuleLocation {
                line: None,
                column: 1
            }
        }
        .is_recoverable());
    }

    #[test]
    fn test_local_fetch_error_suggestion_names_resolved_path() {
        let suggestion = local_fetch_error()
            .suggestion()
            .expect("Fetch should have suggestion");
        assert!(suggestion.contains("/styles/img/missing.png"));
        assert_eq!(local_fetch_error().exit_code(), 66);
    }

    #[test]
    fn test_http_status_error_mentions_plain_http() {
        let err = ConvertError::Fetch {
            reference: "http://example.com/a.gif".to_string(),
            source: FetchError::Status {
                url: "http://example.com/a.gif".to_string(),
                status: 404,
            },
        };

        assert!(err.suggestion().unwrap().contains("http://"));
        assert_eq!(err.exit_code(), 69);
        assert!(err.source().unwrap().to_string().contains("404"));
    }

    #[test]
    fn test_rule_location_display() {
        let with_line = RuleLocation {
            line: Some(7),
            column: 13,
        };
        assert_eq!(with_line.to_string(), "line 7, column 13");

        let without_line = RuleLocation {
            line: None,
            column: 2,
        };
        assert_eq!(without_line.to_string(), "column 2");
    }

    #[test]
    fn test_all_error_variants_have_exit_codes_and_suggestions() {
        let errors = vec![
            ConvertError::SizeLimit {
                size: 3000,
                limit: 2048,
            },
            ConvertError::UnsupportedExtension {
                extension: ".bmp".to_string(),
            },
            local_fetch_error(),
            ConvertError::MalformedRule {
                location: RuleLocation {
                    line: Some(1),
                    column: 1,
                },
            },
            ConvertError::ConfigNotFound {
                path: PathBuf::from("custom.toml"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "test"),
            },
            ConvertError::InvalidConfig {
                message: "test".to_string(),
            },
            ConvertError::io("writing out.css", std::io::Error::other("test")),
        ];

        for err in &errors {
            let exit_code = err.exit_code();
            assert!(exit_code > 0, "Error {:?} should have non-zero exit code", err);
            assert!(exit_code < 256, "Exit code should fit in a byte");
            assert!(
                err.suggestion().is_some_and(|s| !s.is_empty()),
                "Error {:?} should have a suggestion",
                err
            );
        }
    }

    #[test]
    fn test_formatter_renders_chain_and_help() {
        let err = anyhow::Error::new(local_fetch_error());
        let rendered = ErrorFormatter::format(&err);

        assert!(rendered.contains("failed to fetch resource 'img/missing.png'"));
        assert!(rendered.contains("caused by:"));
        assert!(rendered.contains("help:"));
        assert_eq!(ErrorFormatter::exit_code(&err), 66);
    }

    #[test]
    fn test_formatter_falls_back_for_foreign_errors() {
        let err: anyhow::Error = Err::<(), _>(std::io::Error::other("boom"))
            .context("writing summary")
            .unwrap_err();

        let rendered = ErrorFormatter::format(&err);
        assert!(rendered.contains("writing summary"));
        assert!(!rendered.contains("help:"));
        assert_eq!(ErrorFormatter::exit_code(&err), 1);
    }

    #[test]
    fn test_formatter_finds_convert_error_under_context() {
        let err: anyhow::Error = Err::<(), _>(local_fetch_error())
            .context("converting style.css")
            .unwrap_err();

        let rendered = ErrorFormatter::format(&err);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].ends_with("converting style.css"));
        assert!(lines[1].contains("failed to fetch resource 'img/missing.png'"));
        assert!(rendered.contains("help:"));
        assert_eq!(ErrorFormatter::exit_code(&err), 66);
    }
}
