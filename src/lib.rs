//! xptest: command line XPath tester for local HTML/XML files and URLs.

pub mod cli;
pub mod config;
pub mod decode;
pub mod document;
pub mod fetch;
pub mod report;
pub mod source;

// Re-exports for the binary and consumers.
pub use config::{Options, Verbosity};
pub use document::{Document, DocumentError, Match, NamespaceBinding, ParserKind};
pub use fetch::{fetch_content, resolve_user_agent, Content, Fetch, FetchError, HttpFetcher};
pub use report::{render_match, write_report};
pub use source::{resolve_mode, Mode};
