use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::{UTF_8, WINDOWS_1252};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read a script file as text.
pub fn read_source(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_source(&bytes).into_owned())
}

/// Decode script bytes: UTF-8 (BOM stripped), falling back to Windows-1252
/// for files saved by legacy editors.
pub fn decode_source(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}
