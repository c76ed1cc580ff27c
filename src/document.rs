//! Document parsing and XPath evaluation.
//!
//! XML is parsed with `roxmltree`, HTML with `scraper` (html5ever, error tolerant). Both trees
//! are copied into an `sxd_document` package so they share one XPath engine.

use crate::decode::decode;
use roxmltree::NodeType;
use scraper::{ElementRef, Html, Node as HtmlNode};
use std::fmt;
use sxd_document::{dom, Package};
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value};
use thiserror::Error;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Which parser the raw content goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    Html,
    Xml,
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserKind::Html => f.write_str("html"),
            ParserKind::Xml => f.write_str("xml"),
        }
    }
}

/// A namespace prefix made available to queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    pub prefix: String,
    pub uri: String,
}

impl NamespaceBinding {
    /// Parse `prefix=uri`. Both sides must be non-empty.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (prefix, uri) = s.split_once('=').ok_or_else(|| {
            format!(
                "Invalid --namespace: expected 'prefix=uri' (e.g. atom=http://www.w3.org/2005/Atom), got '{}'",
                s
            )
        })?;
        let prefix = prefix.trim();
        let uri = uri.trim();
        if prefix.is_empty() || uri.is_empty() {
            return Err(format!(
                "Invalid --namespace: prefix and uri must both be non-empty, got '{}'",
                s
            ));
        }
        Ok(Self {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
        })
    }
}

/// Errors from parsing content or evaluating a query.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Could not parse XML: {message}")]
    Xml { message: String },

    #[error("Invalid XPath \"{query}\": {message}")]
    XPathSyntax { query: String, message: String },

    #[error("XPath \"{query}\" is empty.")]
    EmptyExpression { query: String },

    #[error("XPath \"{query}\" failed: {message}")]
    XPathEval { query: String, message: String },
}

/// One entry of a result set.
#[derive(Debug, Clone, PartialEq)]
pub enum Match<'d> {
    /// A node from a node-set result, in document order.
    Node(Node<'d>),
    /// The string value of a number, string, or boolean result.
    Value(String),
}

/// A parsed document, owned for the duration of one query.
pub struct Document {
    package: Package,
    kind: ParserKind,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document").field("kind", &self.kind).finish()
    }
}

impl Document {
    /// Parse raw bytes as HTML or XML, detecting the charset from the bytes alone.
    pub fn parse(bytes: &[u8], kind: ParserKind) -> Result<Self, DocumentError> {
        Self::parse_with_content_type(bytes, kind, None)
    }

    /// Parse raw bytes, letting the charset of a Content-Type header pick the encoding.
    pub fn parse_with_content_type(
        bytes: &[u8],
        kind: ParserKind,
        content_type: Option<&str>,
    ) -> Result<Self, DocumentError> {
        let (text, encoding) = decode(bytes, content_type, kind);
        log::debug!("Decoding content as {}.", encoding.name());
        let package = match kind {
            ParserKind::Xml => xml_to_package(&text)?,
            ParserKind::Html => html_to_package(&text),
        };
        Ok(Self { package, kind })
    }

    pub fn kind(&self) -> ParserKind {
        self.kind
    }

    /// Compile and evaluate `query` against the document root.
    pub fn evaluate<'d>(
        &'d self,
        query: &str,
        namespaces: &[NamespaceBinding],
    ) -> Result<Vec<Match<'d>>, DocumentError> {
        let factory = Factory::new();
        let xpath = factory
            .build(query)
            .map_err(|e| DocumentError::XPathSyntax {
                query: query.to_string(),
                message: e.to_string(),
            })?
            .ok_or_else(|| DocumentError::EmptyExpression {
                query: query.to_string(),
            })?;

        let mut context = Context::new();
        for ns in namespaces {
            context.set_namespace(&ns.prefix, &ns.uri);
        }

        let document = self.package.as_document();
        let value = xpath
            .evaluate(&context, document.root())
            .map_err(|e| DocumentError::XPathEval {
                query: query.to_string(),
                message: e.to_string(),
            })?;

        Ok(match value {
            Value::Nodeset(nodes) => nodes
                .document_order()
                .into_iter()
                .map(Match::Node)
                .collect(),
            other => vec![Match::Value(other.string())],
        })
    }
}

/// Parse HTML and copy elements, attributes, text, and comments into a fresh package.
fn html_to_package(text: &str) -> Package {
    let html = Html::parse_document(text);
    let package = Package::new();
    {
        let document = package.as_document();
        let root = document.root();
        // Explicit stack: nesting depth is unbounded in real pages.
        let mut pending = Vec::new();
        for child in html.tree.root().children() {
            match child.value() {
                HtmlNode::Element(_) => {
                    if let Some(source) = ElementRef::wrap(child) {
                        let element = html_element(&document, source);
                        root.append_child(element);
                        pending.push((source, element));
                    }
                }
                HtmlNode::Comment(comment) => {
                    root.append_child(document.create_comment(comment));
                }
                _ => {}
            }
        }
        while let Some((source, parent)) = pending.pop() {
            for child in source.children() {
                match child.value() {
                    HtmlNode::Element(_) => {
                        if let Some(source) = ElementRef::wrap(child) {
                            let element = html_element(&document, source);
                            parent.append_child(element);
                            pending.push((source, element));
                        }
                    }
                    HtmlNode::Text(text) => {
                        parent.append_child(document.create_text(text));
                    }
                    HtmlNode::Comment(comment) => {
                        parent.append_child(document.create_comment(comment));
                    }
                    _ => {}
                }
            }
        }
    }
    package
}

fn html_element<'d>(document: &dom::Document<'d>, source: ElementRef<'_>) -> dom::Element<'d> {
    let element = document.create_element(source.value().name());
    for (name, value) in source.value().attrs() {
        element.set_attribute_value(name, value);
    }
    element
}

/// Parse XML with roxmltree and copy it into a fresh package.
///
/// DTDs are accepted so DOCTYPEs with public/system ids and internal-subset entities parse;
/// external subsets are never loaded.
fn xml_to_package(text: &str) -> Result<Package, DocumentError> {
    let mut options = roxmltree::ParsingOptions::default();
    options.allow_dtd = true;
    let parsed =
        roxmltree::Document::parse_with_options(text, options).map_err(|e| DocumentError::Xml {
            message: e.to_string(),
        })?;

    let package = Package::new();
    {
        let document = package.as_document();
        let root = document.root();
        let mut pending = Vec::new();
        for child in parsed.root().children() {
            match child.node_type() {
                NodeType::Element => {
                    let element = xml_element(&document, child);
                    root.append_child(element);
                    pending.push((child, element));
                }
                NodeType::Comment => {
                    root.append_child(document.create_comment(child.text().unwrap_or_default()));
                }
                NodeType::PI => {
                    if let Some(pi) = child.pi() {
                        root.append_child(
                            document.create_processing_instruction(pi.target, pi.value),
                        );
                    }
                }
                NodeType::Root | NodeType::Text => {}
            }
        }
        while let Some((source, parent)) = pending.pop() {
            for child in source.children() {
                match child.node_type() {
                    NodeType::Element => {
                        let element = xml_element(&document, child);
                        parent.append_child(element);
                        pending.push((child, element));
                    }
                    NodeType::Text => {
                        parent.append_child(document.create_text(child.text().unwrap_or_default()));
                    }
                    NodeType::Comment => {
                        parent
                            .append_child(document.create_comment(child.text().unwrap_or_default()));
                    }
                    NodeType::PI => {
                        if let Some(pi) = child.pi() {
                            parent.append_child(
                                document.create_processing_instruction(pi.target, pi.value),
                            );
                        }
                    }
                    NodeType::Root => {}
                }
            }
        }
    }
    Ok(package)
}

fn xml_element<'d>(document: &dom::Document<'d>, source: roxmltree::Node<'_, '_>) -> dom::Element<'d> {
    let name = source.tag_name();
    let element = match name.namespace() {
        Some(uri) => {
            let element = document.create_element((uri, name.name()));
            element.set_preferred_prefix(source.lookup_prefix(uri));
            element
        }
        None => document.create_element(name.name()),
    };
    for attr in source.attributes() {
        match attr.namespace() {
            Some(uri) => {
                let attribute = element.set_attribute_value((uri, attr.name()), attr.value());
                attribute.set_preferred_prefix(attribute_prefix(source, uri));
            }
            None => {
                element.set_attribute_value(attr.name(), attr.value());
            }
        }
    }
    element
}

/// Namespaced attributes always carry a prefix, so the default namespace never applies.
fn attribute_prefix<'a>(source: roxmltree::Node<'a, '_>, uri: &str) -> Option<&'a str> {
    if uri == XML_NAMESPACE {
        return Some("xml");
    }
    source
        .namespaces()
        .find(|ns| ns.uri() == uri && ns.name().is_some())
        .and_then(|ns| ns.name())
}
