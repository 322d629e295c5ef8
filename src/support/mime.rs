//! MIME type detection
//!
//! Content sniffing first, then a text check, then the file extension.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reported for zero-length files
pub const EMPTY: &str = "inode/x-empty";

/// Reported for UTF-8 content without a known signature
pub const TEXT: &str = "text/plain";

/// Reported when nothing else matches
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Bytes inspected for the text check
const SNIFF_LEN: u64 = 8192;

/// Returns the MIME type of the file at `path`
///
/// Fails if the file cannot be opened or read.
pub fn mime_type(path: impl AsRef<Path>) -> io::Result<String> {
    let path = path.as_ref();

    let mut head = Vec::new();
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;

    if head.is_empty() {
        return Ok(EMPTY.to_string());
    }

    if let Some(kind) = infer::get(&head) {
        return Ok(kind.mime_type().to_string());
    }

    if looks_like_text(&head) {
        return Ok(TEXT.to_string());
    }

    Ok(mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string()))
}

/// UTF-8 without NUL bytes, tolerating a character cut at the sniff boundary
fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    #[test]
    fn png_is_sniffed_regardless_of_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("image.txt");
        fs::write(&path, PNG_HEADER).unwrap();

        assert_eq!(mime_type(&path).unwrap(), "image/png");
    }

    #[test]
    fn utf8_content_is_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes");
        fs::write(&path, "héllo\nworld\n").unwrap();

        assert_eq!(mime_type(&path).unwrap(), TEXT);
    }

    #[test]
    fn empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.bin");
        fs::write(&path, b"").unwrap();

        assert_eq!(mime_type(&path).unwrap(), EMPTY);
    }

    #[test]
    fn binary_falls_back_to_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.css");
        fs::write(&path, [0u8, 159, 146, 150]).unwrap();

        assert_eq!(mime_type(&path).unwrap(), "text/css");
    }

    #[test]
    fn unknown_binary_is_octet_stream() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob");
        fs::write(&path, [0u8, 1, 2, 3, 255]).unwrap();

        assert_eq!(mime_type(&path).unwrap(), OCTET_STREAM);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = mime_type(dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn truncated_multibyte_character_is_still_text() {
        let bytes = "é".as_bytes();
        assert!(looks_like_text(&bytes[..1]));
        assert!(!looks_like_text(&[0xff, 0xfe, 0x41]));
    }
}
