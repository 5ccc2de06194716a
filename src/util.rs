//! Text decoding for style sheets read from disk.

use std::borrow::Cow;

/// Decode style sheet bytes to a string.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the encoding named by a leading `@charset` rule
/// 3. Falls back to Windows-1252 (superset of ISO-8859-1)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(label) = charset_rule(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(label)
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// The label of a `@charset "...";` rule at the very start of a style sheet.
fn charset_rule(bytes: &[u8]) -> Option<&[u8]> {
    let rest = bytes.strip_prefix(b"@charset \"")?;
    let end = memchr::memchr(b'"', rest)?;
    rest.get(end + 1..)?.starts_with(b";").then(|| &rest[..end])
}
