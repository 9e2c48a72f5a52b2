//! Base64 data URI encoding

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ConvertError;

/// Largest resource inlined by default (2 KB)
pub const DEFAULT_THRESHOLD_BYTES: usize = 2 * 1024;

/// Encode `bytes` as `data:<mime>;base64,<payload>`.
///
/// The payload is a single line. Resources strictly larger than
/// `threshold_bytes` are refused with [`ConvertError::SizeLimit`].
///
/// # Examples
///
/// ```
/// use css_datauri::converter::data_uri::encode;
///
/// let uri = encode(b"GIF89a", "image/gif", 2048)?;
/// assert_eq!(uri, "data:image/gif;base64,R0lGODlh");
/// # Ok::<(), css_datauri::error::ConvertError>(())
/// ```
pub fn encode(bytes: &[u8], mime: &str, threshold_bytes: usize) -> Result<String, ConvertError> {
    if bytes.len() > threshold_bytes {
        return Err(ConvertError::SizeLimit {
            size: bytes.len(),
            limit: threshold_bytes,
        });
    }

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}
