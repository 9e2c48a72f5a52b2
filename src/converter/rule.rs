//! Locating the `url(...)` token on a line
//!
//! The scan starts at the first `url(` marker and walks to the `)` that balances
//! it. Parentheses inside a quoted reference do not count, so `url("a).png")` is
//! a single token and a second `url(...)` later on the line is left alone.

use crate::error::{ConvertError, RuleLocation};

/// Marker that opens a resource reference
pub const URL_MARKER: &str = "url(";

/// A resource reference found on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlToken<'a> {
    /// Byte offset of the `url(` marker
    pub marker_start: usize,
    /// Byte offset of the reference text
    pub reference_start: usize,
    /// Reference with surrounding whitespace and quotes removed
    pub reference: &'a str,
}

/// Find the first `url(...)` token on `line`.
///
/// Returns `Ok(None)` when the line has no marker and
/// [`ConvertError::MalformedRule`] when the marker is never closed.
///
/// # Examples
///
/// ```
/// use css_datauri::converter::rule::find_url_token;
///
/// let token = find_url_token("a { background: url( 'img/x.png' ) }")?.unwrap();
/// assert_eq!(token.reference, "img/x.png");
/// assert_eq!(token.marker_start, 16);
///
/// assert!(find_url_token("body { color: red; }")?.is_none());
/// assert!(find_url_token("a { background: url(x.png }").is_err());
/// # Ok::<(), css_datauri::error::ConvertError>(())
/// ```
pub fn find_url_token(line: &str) -> Result<Option<UrlToken<'_>>, ConvertError> {
    let Some(marker_start) = line.find(URL_MARKER) else {
        return Ok(None);
    };
    let body_start = marker_start + URL_MARKER.len();
    let close = matching_paren(&line[body_start..])
        .map(|offset| body_start + offset)
        .ok_or(ConvertError::MalformedRule {
            location: RuleLocation {
                line: None,
                column: marker_start + 1,
            },
        })?;

    let (offset, reference) = unquote(&line[body_start..close]);
    Ok(Some(UrlToken {
        marker_start,
        reference_start: body_start + offset,
        reference,
    }))
}

/// Offset of the `)` closing an already opened parenthesis
///
/// A string only opens when a quote is the first non-blank character of the
/// body. A quote that is never closed falls back to a plain scan.
fn matching_paren(body: &str) -> Option<usize> {
    quoted_close(body).or_else(|| balanced_close(body, 0))
}

fn quoted_close(body: &str) -> Option<usize> {
    let start = body.len() - body.trim_start().len();
    let quote = body[start..]
        .chars()
        .next()
        .filter(|c| matches!(c, '"' | '\''))?;
    let open = start + quote.len_utf8();
    let close_quote = open + body[open..].find(quote)?;
    balanced_close(body, close_quote + quote.len_utf8())
}

fn balanced_close(body: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, ch) in body[from..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte offset of the first `url(` marker in raw input
pub fn find_marker(line: &[u8]) -> Option<usize> {
    line.windows(URL_MARKER.len())
        .position(|window| window == URL_MARKER.as_bytes())
}

/// Strip whitespace and one pair of matching quotes, returning the offset of what is left
fn unquote(raw: &str) -> (usize, &str) {
    let trimmed = raw.trim();
    let mut offset = raw.len() - raw.trim_start().len();

    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            offset += quote.len_utf8();
            return (offset, inner);
        }
    }

    (offset, trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(line: &str) -> &str {
        find_url_token(line).unwrap().unwrap().reference
    }

    #[test]
    fn test_plain_reference() {
        let line = "background: url(icon.png);";
        let token = find_url_token(line).unwrap().unwrap();
        assert_eq!(token.reference, "icon.png");
        assert_eq!(&line[token.reference_start..], "icon.png);");
    }

    #[test]
    fn test_quoted_references_keep_quotes_in_line() {
        let line = "a { b: url(\"img/x.gif\") }";
        let token = find_url_token(line).unwrap().unwrap();
        assert_eq!(token.reference, "img/x.gif");
        assert_eq!(&line[token.reference_start - 1..token.reference_start], "\"");

        assert_eq!(reference("url('x.jpg')"), "x.jpg");
    }

    #[test]
    fn test_mismatched_quotes_are_kept() {
        assert_eq!(reference("url(\"x.jpg')"), "\"x.jpg'");
        assert_eq!(reference("a: url(\"x.jpg') b: url(y.png)"), "\"x.jpg'");
    }

    #[test]
    fn test_quote_inside_unquoted_reference() {
        assert_eq!(reference("url(it's.png) no-repeat"), "it's.png");
        assert_eq!(reference("url(say\"hi\".gif)"), "say\"hi\".gif");
    }

    #[test]
    fn test_find_marker_in_raw_bytes() {
        assert_eq!(find_marker(b"/* caf\xe9 */ a: url(x.png)"), Some(14));
        assert_eq!(find_marker(b"\xff\xfe body {}"), None);
        assert_eq!(find_marker(b"url"), None);
    }

    #[test]
    fn test_only_first_token_is_taken() {
        let line = "b: url(a.png), url(b.png);";
        assert_eq!(reference(line), "a.png");
    }

    #[test]
    fn test_nested_and_quoted_parentheses() {
        assert_eq!(reference("url(a(1).png) x"), "a(1).png");
        assert_eq!(reference("url(\"a).png\")"), "a).png");
    }

    #[test]
    fn test_empty_reference() {
        assert_eq!(reference("url()"), "");
        assert_eq!(reference("url(   )"), "");
    }

    #[test]
    fn test_unterminated_marker_reports_column() {
        let err = find_url_token("  a: url(x.png\n").unwrap_err();
        match err {
            ConvertError::MalformedRule { location } => {
                assert_eq!(location.column, 6);
                assert_eq!(location.line, None);
            }
            other => panic!("expected MalformedRule, got {:?}", other),
        }
    }

    #[test]
    fn test_stray_close_before_marker_is_ignored() {
        assert_eq!(reference(") a: url(x.png)"), "x.png");
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        assert!(find_url_token("a: URL(x.png)").unwrap().is_none());
    }
}
