//! Content fetching. Reads local files or fetches URLs through the [Fetch] trait.

mod client;
mod error;
pub mod user_agent;

pub use client::{HttpFetcher, HttpFetcherBuilder};
pub use error::FetchError;
pub use user_agent::{resolve_user_agent, DEFAULT_USER_AGENT};

use crate::source::Mode;
use std::io::ErrorKind;
use std::path::Path;

/// Raw payload plus whatever metadata the transport reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    pub body: Vec<u8>,
    /// Final URI after redirects (URL mode only).
    pub base_uri: Option<String>,
    pub content_type: Option<String>,
    pub last_modified: Option<String>,
}

impl Content {
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Transport for URL sources. Blocks until bytes or an error are produced.
pub trait Fetch {
    fn fetch(&mut self, url: &str) -> Result<Content, FetchError>;
}

/// Read a file fully. A file that no longer exists yields `Ok(None)`.
pub fn read_file(path: &Path) -> Result<Option<Content>, FetchError> {
    match std::fs::read(path) {
        Ok(body) => Ok(Some(Content {
            body,
            ..Content::default()
        })),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(FetchError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Obtain content for `source` in the given mode. URL mode goes through `fetcher`;
/// file mode never touches it.
pub fn fetch_content<F: Fetch + ?Sized>(
    source: &str,
    mode: Mode,
    fetcher: &mut F,
) -> Result<Option<Content>, FetchError> {
    match mode {
        Mode::File => {
            let content = read_file(Path::new(source))?;
            log::debug!("Read in from {}", source);
            Ok(content)
        }
        Mode::Url => {
            let content = fetcher.fetch(source)?;
            log::info!(
                "Read in {} ({}). Last modified {}",
                content.base_uri.as_deref().unwrap_or(source),
                content.content_type.as_deref().unwrap_or("unknown content type"),
                content.last_modified.as_deref().unwrap_or("unknown")
            );
            log::debug!("{}", String::from_utf8_lossy(&content.body));
            log::debug!("Read in from {}", source);
            Ok(Some(content))
        }
    }
}
