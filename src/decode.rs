//! Charset detection for raw content.
//!
//! Precedence: byte order mark, then the `charset` parameter of the Content-Type header, then
//! the in-document declaration (`<?xml encoding=...?>` or `<meta charset>`), then detection.

use crate::document::ParserKind;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::borrow::Cow;

/// How far into an HTML document to look for a `<meta>` charset.
const META_PRESCAN_BYTES: usize = 1024;

/// Decode `bytes` to text. A leading BOM is always removed.
pub fn decode<'a>(
    bytes: &'a [u8],
    content_type: Option<&str>,
    kind: ParserKind,
) -> (Cow<'a, str>, &'static Encoding) {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| declared_encoding(bytes, kind))
        .unwrap_or_else(|| detect(bytes));
    // decode() sniffs a BOM first and lets it override the chosen encoding.
    let (text, used, _) = encoding.decode(bytes);
    (text, used)
}

/// Extract the charset parameter from a Content-Type value.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

/// Encoding named inside the document itself. A UTF-16 label found by an ASCII scan is
/// necessarily wrong, so it maps to UTF-8.
fn declared_encoding(bytes: &[u8], kind: ParserKind) -> Option<&'static Encoding> {
    let label = match kind {
        ParserKind::Xml => xml_declared_label(bytes),
        ParserKind::Html => html_meta_label(bytes),
    }?;
    let encoding = Encoding::for_label(label.as_bytes())?;
    if encoding == UTF_16LE || encoding == UTF_16BE {
        Some(UTF_8)
    } else {
        Some(encoding)
    }
}

fn xml_declared_label(bytes: &[u8]) -> Option<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if !bytes.starts_with(b"<?xml") {
        return None;
    }
    let end = bytes.windows(2).position(|w| w == b"?>")?;
    let decl = String::from_utf8_lossy(&bytes[..end]);
    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    Some(value[..value.find(quote)?].to_string())
}

fn html_meta_label(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let mut search = 0;
    while let Some(found) = head[search..].find("<meta") {
        let start = search + found;
        let end = head[start..].find('>').map_or(head.len(), |i| start + i);
        let tag = &head[start..end];
        if let Some(pos) = tag.find("charset") {
            let rest = tag[pos + "charset".len()..].trim_start();
            if let Some(rest) = rest.strip_prefix('=') {
                let value: String = rest
                    .trim_start()
                    .trim_start_matches(['"', '\''])
                    .chars()
                    .take_while(|c| !matches!(c, '"' | '\'' | ';' | '/' | '>') && !c.is_whitespace())
                    .collect();
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        search = end;
    }
    None
}

/// Valid UTF-8 stays UTF-8; anything else goes to chardetng.
fn detect(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}
