//! Source classification: decide whether the source argument is a file or a URL.

use reqwest::Url;
use std::fmt;
use std::path::Path;

/// How the source argument is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    File,
    Url,
}

/// Used when the source is neither an existing path nor a URI.
pub const DEFAULT_MODE: Mode = Mode::File;

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::File => f.write_str("file"),
            Mode::Url => f.write_str("url"),
        }
    }
}

/// True when `source` is an absolute URI (`scheme:rest`).
pub fn looks_like_uri(source: &str) -> bool {
    Url::parse(source).is_ok()
}

/// Resolve the mode for `source`. A forced mode wins; otherwise an existing filesystem
/// entry means file, a URI means url, and anything else falls back to [DEFAULT_MODE].
/// Never touches the network.
pub fn resolve_mode(source: &str, forced: Option<Mode>) -> Mode {
    if let Some(mode) = forced {
        return mode;
    }
    if Path::new(source).exists() {
        Mode::File
    } else if looks_like_uri(source) {
        Mode::Url
    } else {
        DEFAULT_MODE
    }
}
