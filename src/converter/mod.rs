//! Stylesheet converter
//!
//! Rewrites `url(...)` references to small images as inline base64 data URIs,
//! one line at a time. Lines come out in the same order and count as they went
//! in; only the reference text inside the first `url(...)` token of a line is
//! ever replaced.
//!
//! Failure policy:
//! - resource over the size threshold: line emitted unchanged
//! - extension without a MIME type: line emitted unchanged
//! - fetch failure or unterminated `url(`: the whole run aborts and the
//!   output file is left untouched

pub mod data_uri;
pub mod mime;
pub mod rule;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use log::{debug, info, warn};

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::fetch::{RealFetcher, ResourceFetcher, ResourceLocation, REMOTE_PREFIX};
use crate::report::ConversionReport;

/// What happened to a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// No `url(` marker on the line
    Unchanged,
    /// Reference replaced by a data URI
    Converted {
        /// Reference text as written
        reference: String,
        /// Size of the inlined resource
        bytes: usize,
    },
    /// Resource over the size threshold, line left as is
    TooLarge {
        /// Reference text as written
        reference: String,
        /// Size of the resource
        bytes: usize,
    },
    /// Extension has no MIME type, line left as is
    Unsupported {
        /// Reference text as written
        reference: String,
    },
}

/// Converted text of a line together with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedLine {
    /// Line to write out, line ending included
    pub text: String,
    /// What happened to the line
    pub outcome: LineOutcome,
}

impl ConvertedLine {
    fn unchanged(line: &str, outcome: LineOutcome) -> Self {
        Self {
            text: line.to_string(),
            outcome,
        }
    }
}

/// Converts stylesheet lines relative to a base directory
///
/// # Examples
///
/// ```
/// use css_datauri::config::ConverterConfig;
/// use css_datauri::converter::StylesheetConverter;
///
/// let converter = StylesheetConverter::new("/a/b", ConverterConfig::default());
/// let converted = converter.convert_line("body { color: red; }\n")?;
/// assert_eq!(converted.text, "body { color: red; }\n");
/// # Ok::<(), css_datauri::error::ConvertError>(())
/// ```
pub struct StylesheetConverter<F = RealFetcher> {
    base_dir: PathBuf,
    config: ConverterConfig,
    fetcher: F,
}

impl StylesheetConverter<RealFetcher> {
    /// Converter resolving local references against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>, config: ConverterConfig) -> Self {
        Self::with_fetcher(base_dir, config, RealFetcher::new())
    }

    /// Converter for the stylesheet at `input`, resolving against its directory
    pub fn for_input(input: &Path, config: ConverterConfig) -> Result<Self, ConvertError> {
        Ok(Self::new(base_dir_of(input)?, config))
    }
}

impl<F: ResourceFetcher> StylesheetConverter<F> {
    /// Converter with a custom fetcher
    pub fn with_fetcher(base_dir: impl Into<PathBuf>, config: ConverterConfig, fetcher: F) -> Self {
        Self {
            base_dir: base_dir.into(),
            config,
            fetcher,
        }
    }

    /// Directory local references resolve against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Settings in effect
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert one line.
    ///
    /// Lines without a `url(` marker, with an unsupported extension, or whose
    /// resource exceeds the threshold come back byte-for-byte identical.
    pub fn convert_line(&self, line: &str) -> Result<ConvertedLine, ConvertError> {
        let Some(token) = rule::find_url_token(line)? else {
            return Ok(ConvertedLine::unchanged(line, LineOutcome::Unchanged));
        };
        let reference = token.reference;

        let Some(extension) = mime::extension_of(reference)
            .filter(|ext| self.config.mime_types.lookup(ext).is_some())
        else {
            debug!("skipping '{}': unsupported extension", reference);
            return Ok(ConvertedLine::unchanged(
                line,
                LineOutcome::Unsupported {
                    reference: reference.to_string(),
                },
            ));
        };

        let location = self.resolve_path(reference);
        let bytes = self.fetch_bytes(reference, &location)?;

        match self.encode_data_uri(&bytes, extension) {
            Ok(uri) => {
                debug!("inlined '{}' ({} bytes)", reference, bytes.len());
                // The reference sits at the start of the tail, so nothing earlier can match
                let text = format!(
                    "{}{}",
                    &line[..token.reference_start],
                    substitute(&line[token.reference_start..], reference, &uri)
                );
                Ok(ConvertedLine {
                    text,
                    outcome: LineOutcome::Converted {
                        reference: reference.to_string(),
                        bytes: bytes.len(),
                    },
                })
            }
            Err(ConvertError::SizeLimit { size, limit }) => {
                info!(
                    "keeping '{}': {} bytes exceeds the {} byte threshold",
                    reference, size, limit
                );
                Ok(ConvertedLine::unchanged(
                    line,
                    LineOutcome::TooLarge {
                        reference: reference.to_string(),
                        bytes: size,
                    },
                ))
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a reference to a fetch location.
    ///
    /// `http://` references are used verbatim. Anything else is joined onto the
    /// base directory, with symbolic links resolved when the target exists and
    /// `.`/`..` segments normalized otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use css_datauri::config::ConverterConfig;
    /// use css_datauri::converter::StylesheetConverter;
    /// use css_datauri::fetch::ResourceLocation;
    /// use std::path::PathBuf;
    ///
    /// let converter = StylesheetConverter::new("/a/b", ConverterConfig::default());
    /// assert_eq!(
    ///     converter.resolve_path("img/x.png"),
    ///     ResourceLocation::Local(PathBuf::from("/a/b/img/x.png"))
    /// );
    /// ```
    pub fn resolve_path(&self, reference: &str) -> ResourceLocation {
        if reference.starts_with(REMOTE_PREFIX) {
            return ResourceLocation::Remote(reference.to_string());
        }

        let joined = self.base_dir.join(reference);
        let resolved = joined
            .canonicalize()
            .unwrap_or_else(|_| normalize_lexically(&joined));
        ResourceLocation::Local(resolved)
    }

    /// Retrieve the bytes behind a resolved reference
    pub fn fetch_bytes(
        &self,
        reference: &str,
        location: &ResourceLocation,
    ) -> Result<Vec<u8>, ConvertError> {
        self.fetcher
            .fetch(location)
            .map_err(|source| ConvertError::Fetch {
                reference: reference.to_string(),
                source,
            })
    }

    /// Encode resource bytes for an extension such as `.png`
    pub fn encode_data_uri(&self, bytes: &[u8], extension: &str) -> Result<String, ConvertError> {
        let mime = self.config.mime_types.lookup(extension).ok_or_else(|| {
            ConvertError::UnsupportedExtension {
                extension: extension.to_string(),
            }
        })?;
        data_uri::encode(bytes, mime, self.config.threshold_bytes)
    }

    /// Convert every line of `reader` into `writer`, keeping line endings as read.
    ///
    /// Input is handled as raw bytes. Lines without a `url(` marker are copied
    /// verbatim whatever their encoding. On a marker line only the UTF-8 run
    /// starting at the marker is converted; bytes before it and any invalid
    /// bytes after that run are copied through.
    pub fn convert_reader<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> Result<ConversionReport, ConvertError> {
        let mut report = ConversionReport::default();
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| ConvertError::io(format!("reading line {}", report.lines + 1), e))?;
            if read == 0 {
                break;
            }
            report.lines += 1;

            let Some(marker) = rule::find_marker(&line) else {
                writer
                    .write_all(&line)
                    .map_err(|e| ConvertError::io("writing output", e))?;
                report.record(&LineOutcome::Unchanged);
                continue;
            };

            let (head, tail) = line.split_at(marker);
            let (text, rest) = match std::str::from_utf8(tail) {
                Ok(text) => (text, &[][..]),
                Err(e) => {
                    let (valid, rest) = tail.split_at(e.valid_up_to());
                    let text = std::str::from_utf8(valid).map_err(|e| {
                        ConvertError::io(
                            format!("decoding line {}", report.lines),
                            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                        )
                    })?;
                    (text, rest)
                }
            };

            let converted = self.convert_line(text).map_err(|e| match e {
                ConvertError::MalformedRule { mut location } => {
                    location.line = Some(report.lines);
                    location.column += head.len();
                    ConvertError::MalformedRule { location }
                }
                other => other,
            })?;

            for chunk in [head, converted.text.as_bytes(), rest] {
                writer
                    .write_all(chunk)
                    .map_err(|e| ConvertError::io("writing output", e))?;
            }
            report.record(&converted.outcome);
        }

        writer
            .flush()
            .map_err(|e| ConvertError::io("flushing output", e))?;
        Ok(report)
    }
}

/// Replace the first occurrence of `original` in `line` with `data_uri`
///
/// # Examples
///
/// ```
/// use css_datauri::converter::substitute;
///
/// assert_eq!(
///     substitute("url(a.gif) url(a.gif)", "a.gif", "data:image/gif;base64,"),
///     "url(data:image/gif;base64,) url(a.gif)"
/// );
/// ```
pub fn substitute(line: &str, original: &str, data_uri: &str) -> String {
    line.replacen(original, data_uri, 1)
}

/// Convert the stylesheet at `input` into `output`.
///
/// The result is staged in a temporary file beside `output` and moved over it
/// only once every line converted, so a failed run never leaves a partial file.
pub fn run(
    input: &Path,
    output: &Path,
    config: ConverterConfig,
) -> Result<ConversionReport, ConvertError> {
    let converter = StylesheetConverter::for_input(input, config)?;
    info!(
        "converting {} -> {} (threshold {} bytes)",
        input.display(),
        output.display(),
        converter.config().threshold_bytes
    );

    let source = File::open(input)
        .map_err(|e| ConvertError::io(format!("opening {}", input.display()), e))?;

    let output_dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = staging_file(output_dir)?;

    let report = {
        let writer = BufWriter::new(staged.as_file_mut());
        converter.convert_reader(BufReader::new(source), writer)?
    };

    staged
        .persist(output)
        .map_err(|e| ConvertError::io(format!("writing {}", output.display()), e.error))?;

    if report.too_large > 0 || report.unsupported > 0 {
        warn!(
            "{} reference(s) left as is ({} too large, {} unsupported)",
            report.too_large + report.unsupported,
            report.too_large,
            report.unsupported
        );
    }
    Ok(report)
}

fn staging_file(dir: &Path) -> Result<tempfile::NamedTempFile, ConvertError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".css-datauri-");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }

    builder
        .tempfile_in(dir)
        .map_err(|e| ConvertError::io(format!("creating output in {}", dir.display()), e))
}

fn base_dir_of(input: &Path) -> Result<PathBuf, ConvertError> {
    let absolute = std::path::absolute(input)
        .map_err(|e| ConvertError::io(format!("resolving {}", input.display()), e))?;
    Ok(absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(absolute))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
