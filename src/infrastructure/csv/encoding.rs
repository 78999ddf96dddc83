// ============================================================
// TEXT ENCODINGS
// ============================================================
// Candidate encodings and strict / lossy decoding

use encoding_rs::Encoding;

use crate::domain::error::{AppError, Result};

/// Encoding labels tried while sniffing, in priority order
pub const CANDIDATE_ENCODING_LABELS: [&str; 4] = ["utf-8", "latin1", "cp1252", "iso-8859-1"];

/// Resolve an encoding label (`utf-8`, `latin1`, `windows-1252`, ...)
pub fn resolve(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| AppError::ParseError(format!("Unknown text encoding: {}", label)))
}

/// Candidate encodings with labels that resolve to an already listed
/// encoding removed. `latin1` and `iso-8859-1` both decode as windows-1252.
pub fn candidate_encodings() -> Vec<&'static Encoding> {
    let mut out: Vec<&'static Encoding> = Vec::new();
    for label in CANDIDATE_ENCODING_LABELS {
        match Encoding::for_label(label.as_bytes()) {
            Some(encoding) if !out.contains(&encoding) => out.push(encoding),
            Some(encoding) => {
                tracing::trace!(label, encoding = encoding.name(), "Encoding already tried")
            }
            None => tracing::warn!(label, "Unknown candidate encoding label"),
        }
    }
    out
}

/// Decode, failing on any malformed sequence. A leading BOM is removed.
pub fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(AppError::ParseError(format!(
            "Content is not valid {}",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}

/// Leading bytes holding at most `lines` lines. The cut is made right after
/// a `\n`, which never splits a UTF-8 sequence or a single-byte character.
pub fn preview_window(bytes: &[u8], lines: usize) -> &[u8] {
    if lines == 0 {
        return &bytes[..0];
    }
    match bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .nth(lines - 1)
    {
        Some((end, _)) => &bytes[..=end],
        None => bytes,
    }
}

/// Decode, replacing malformed sequences with U+FFFD
pub fn decode_lossy(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _) = encoding.decode_with_bom_removal(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1252};

    #[test]
    fn test_candidates_are_deduplicated() {
        let encodings = candidate_encodings();
        assert_eq!(encodings, vec![UTF_8, WINDOWS_1252]);
    }

    #[test]
    fn test_strict_utf8_rejects_latin1_bytes() {
        let bytes = b"name;city\nJos\xe9;M\xe1laga\n";
        assert!(decode_strict(bytes, UTF_8).is_err());
        let decoded = decode_strict(bytes, WINDOWS_1252).unwrap();
        assert!(decoded.contains("José"));
    }

    #[test]
    fn test_bom_removed() {
        let bytes = b"\xef\xbb\xbfa,b\n1,2\n";
        assert_eq!(decode_strict(bytes, UTF_8).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn test_preview_window_stops_at_line_end() {
        let bytes = "ciudad,n\nMálaga,1\nCórdoba,2\nBad\n".as_bytes();
        let window = preview_window(bytes, 2);
        assert_eq!(decode_strict(window, UTF_8).unwrap(), "ciudad,n\nMálaga,1\n");
        assert_eq!(preview_window(bytes, 10), bytes);
        assert!(preview_window(bytes, 0).is_empty());
    }

    #[test]
    fn test_resolve_unknown_label() {
        assert!(resolve("not-an-encoding").is_err());
        assert_eq!(resolve("UTF-8").unwrap(), UTF_8);
    }
}
