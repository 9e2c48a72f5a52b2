//! Extension to MIME type lookup

use std::collections::BTreeMap;

/// Built-in extension table. Matching is case-sensitive.
pub const DEFAULT_MIME_TYPES: [(&str, &str); 4] = [
    (".gif", "image/gif"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
];

/// Extension (with leading dot) to MIME type table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeTable {
    entries: BTreeMap<String, String>,
}

impl Default for MimeTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_MIME_TYPES
                .iter()
                .map(|(ext, mime)| (ext.to_string(), mime.to_string()))
                .collect(),
        }
    }
}

impl MimeTable {
    /// Add or replace an entry
    pub fn insert(&mut self, extension: &str, mime: &str) {
        self.entries.insert(extension.to_string(), mime.to_string());
    }

    /// MIME type for an extension such as `.png`
    pub fn lookup(&self, extension: &str) -> Option<&str> {
        self.entries.get(extension).map(String::as_str)
    }

    /// Whether the extension of `reference` has a MIME type
    pub fn supports(&self, reference: &str) -> bool {
        extension_of(reference).is_some_and(|ext| self.lookup(ext).is_some())
    }
}

/// Extension of the last path segment, including the leading dot.
///
/// Leading dots of the segment do not start an extension, so `.png` has none
/// while `img/x.png` has `.png`. Query strings are not stripped.
///
/// # Examples
///
/// ```
/// use css_datauri::converter::mime::extension_of;
///
/// assert_eq!(extension_of("img/x.png"), Some(".png"));
/// assert_eq!(extension_of("http://example.com/a.tar.gif"), Some(".gif"));
/// assert_eq!(extension_of("img/.hidden"), None);
/// assert_eq!(extension_of("img.d/readme"), None);
/// ```
pub fn extension_of(reference: &str) -> Option<&str> {
    let segment_start = reference.rfind('/').map_or(0, |i| i + 1);
    let segment = &reference[segment_start..];
    let dot = segment.rfind('.')?;

    if segment[..dot].chars().all(|c| c == '.') {
        return None;
    }
    Some(&segment[dot..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = MimeTable::default();
        assert_eq!(table.lookup(".gif"), Some("image/gif"));
        assert_eq!(table.lookup(".png"), Some("image/png"));
        assert_eq!(table.lookup(".jpg"), Some("image/jpeg"));
        assert_eq!(table.lookup(".jpeg"), Some("image/jpeg"));
        assert_eq!(table.lookup(".bmp"), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = MimeTable::default();
        assert_eq!(table.lookup(".PNG"), None);
        assert!(!table.supports("LOGO.JPG"));
    }

    #[test]
    fn test_insert_extends_table() {
        let mut table = MimeTable::default();
        table.insert(".svg", "image/svg+xml");
        assert!(table.supports("icons/arrow.svg"));
        assert!(table.supports("icons/arrow.png"));
    }

    #[test]
    fn test_extension_of_edge_cases() {
        assert_eq!(extension_of(""), None);
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of("..png"), None);
        assert_eq!(extension_of("a."), Some("."));
        assert_eq!(extension_of("../img/x.jpeg"), Some(".jpeg"));
        assert_eq!(extension_of("a.png?v=2"), Some(".png?v=2"));
    }

    #[test]
    fn test_query_string_makes_reference_unsupported() {
        assert!(!MimeTable::default().supports("a.png?v=2"));
    }
}
