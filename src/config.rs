//! Run configuration. Built once from parsed arguments and passed by reference afterwards.
//! There is no config file and no environment lookup: flags override defaults, nothing else.

use crate::cli::Args;
use crate::document::{NamespaceBinding, ParserKind};
use crate::fetch::{resolve_user_agent, DEFAULT_USER_AGENT};
use crate::source::Mode;
use log::LevelFilter;

/// How much diagnostic output goes to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    /// Progress and fetch metadata.
    Verbose,
    /// Verbose plus raw content.
    ExtraVerbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, extra_verbose: bool) -> Self {
        if extra_verbose {
            Verbosity::ExtraVerbose
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Quiet
        }
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Warn,
            Verbosity::Verbose => LevelFilter::Info,
            Verbosity::ExtraVerbose => LevelFilter::Debug,
        }
    }
}

/// Immutable options for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub verbosity: Verbosity,
    /// `None` means autodetect.
    pub forced_mode: Option<Mode>,
    pub parser: ParserKind,
    /// Final User-Agent header value, shortcuts already expanded.
    pub user_agent: String,
    pub namespaces: Vec<NamespaceBinding>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Quiet,
            forced_mode: None,
            parser: ParserKind::Html,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            namespaces: Vec::new(),
        }
    }
}

impl Options {
    /// Resolve flags into options. The User-Agent shortcut table is consulted here and only here.
    pub fn from_args(args: &Args) -> Self {
        let forced_mode = if args.file {
            Some(Mode::File)
        } else if args.url {
            Some(Mode::Url)
        } else {
            None
        };
        let parser = if args.xml {
            ParserKind::Xml
        } else {
            ParserKind::Html
        };
        let user_agent = args
            .user_agent
            .as_deref()
            .map(resolve_user_agent)
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        Self {
            verbosity: Verbosity::from_flags(args.verbose, args.extra_verbose),
            forced_mode,
            parser,
            user_agent,
            namespaces: args.namespace.clone(),
        }
    }
}
