//! Result output: one serialized match per line, a blank line, then the summary.

use crate::document::{Match, ParserKind};
use std::io::{self, Write};
use sxd_document::dom::{self, ChildOfElement, ChildOfRoot};
use sxd_xpath::nodeset::Node;

/// HTML elements that never have a closing tag.
const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// HTML elements whose text content is written without escaping.
const HTML_RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Write every match, a blank line, and `Showing <N> results for "<query>".`
pub fn write_report<W: Write>(
    out: &mut W,
    matches: &[Match<'_>],
    kind: ParserKind,
    query: &str,
) -> io::Result<()> {
    for m in matches {
        writeln!(out, "{}", render_match(m, kind))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", summary_line(matches.len(), query))?;
    Ok(())
}

pub fn summary_line(count: usize, query: &str) -> String {
    format!("Showing {} results for \"{}\".", count, query)
}

/// Serialize one match to its textual form.
pub fn render_match(m: &Match<'_>, kind: ParserKind) -> String {
    match m {
        Match::Value(v) => v.clone(),
        Match::Node(node) => {
            let mut out = String::new();
            write_node(&mut out, *node, kind);
            out
        }
    }
}

fn write_node(out: &mut String, node: Node<'_>, kind: ParserKind) {
    match node {
        Node::Root(root) => {
            for child in root.children() {
                match child {
                    ChildOfRoot::Element(e) => write_element(out, e, kind),
                    ChildOfRoot::Comment(c) => write_comment(out, c),
                    ChildOfRoot::ProcessingInstruction(pi) => write_pi(out, pi),
                }
            }
        }
        Node::Element(e) => write_element(out, e, kind),
        Node::Attribute(a) => write_attribute(out, a),
        Node::Text(t) => write_text(out, t, kind),
        Node::Comment(c) => write_comment(out, c),
        Node::ProcessingInstruction(pi) => write_pi(out, pi),
        Node::Namespace(ns) => {
            out.push_str("xmlns:");
            out.push_str(ns.prefix());
            out.push_str("=\"");
            out.push_str(&escape_attr(ns.uri()));
            out.push('"');
        }
    }
}

/// One unit of work for the element writer.
enum Step<'d> {
    Open(ChildOfElement<'d>),
    /// Write the closing tag, then drop the declarations made by that element.
    Close { tag: String, scope_len: usize },
}

/// Namespace declarations in force: `(prefix, uri)`, `None` being the default namespace.
type Scope = Vec<(Option<String>, String)>;

/// Serialize an element subtree. Uses an explicit stack, so nesting depth is bounded only by
/// memory.
fn write_element(out: &mut String, element: dom::Element<'_>, kind: ParserKind) {
    let mut scope = Scope::new();
    let mut steps = vec![Step::Open(ChildOfElement::Element(element))];
    while let Some(step) = steps.pop() {
        match step {
            Step::Close { tag, scope_len } => {
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
                scope.truncate(scope_len);
            }
            Step::Open(ChildOfElement::Text(t)) => write_text(out, t, kind),
            Step::Open(ChildOfElement::Comment(c)) => write_comment(out, c),
            Step::Open(ChildOfElement::ProcessingInstruction(pi)) => write_pi(out, pi),
            Step::Open(ChildOfElement::Element(element)) => {
                let scope_len = scope.len();
                let name = element.name();
                let tag = qualified(element.preferred_prefix(), name.local_part());

                out.push('<');
                out.push_str(&tag);
                match name.namespace_uri() {
                    Some(uri) => declare(out, &mut scope, element.preferred_prefix(), uri),
                    None if bound_uri(&scope, None).is_some_and(|uri| !uri.is_empty()) => {
                        declare(out, &mut scope, None, "")
                    }
                    None => {}
                }
                for attribute in element.attributes() {
                    if let (Some(uri), Some(prefix)) =
                        (attribute.name().namespace_uri(), attribute.preferred_prefix())
                    {
                        declare(out, &mut scope, Some(prefix), uri);
                    }
                }
                for attribute in element.attributes() {
                    out.push(' ');
                    write_attribute(out, attribute);
                }

                let children = element.children();
                if children.is_empty() {
                    match kind {
                        ParserKind::Xml => out.push_str("/>"),
                        ParserKind::Html if is_html_void(name.local_part()) => out.push('>'),
                        ParserKind::Html => {
                            out.push_str("></");
                            out.push_str(&tag);
                            out.push('>');
                        }
                    }
                    scope.truncate(scope_len);
                    continue;
                }

                out.push('>');
                steps.push(Step::Close { tag, scope_len });
                steps.extend(children.into_iter().rev().map(Step::Open));
            }
        }
    }
}

fn bound_uri<'s>(scope: &'s Scope, prefix: Option<&str>) -> Option<&'s str> {
    scope
        .iter()
        .rev()
        .find(|(p, _)| p.as_deref() == prefix)
        .map(|(_, uri)| uri.as_str())
}

/// Write `xmlns[:prefix]="uri"` unless that exact binding is already in scope.
fn declare(out: &mut String, scope: &mut Scope, prefix: Option<&str>, uri: &str) {
    if prefix == Some("xml") || bound_uri(scope, prefix) == Some(uri) {
        return;
    }
    match prefix {
        Some(p) => {
            out.push_str(" xmlns:");
            out.push_str(p);
            out.push_str("=\"");
        }
        None => out.push_str(" xmlns=\""),
    }
    out.push_str(&escape_attr(uri));
    out.push('"');
    scope.push((prefix.map(str::to_string), uri.to_string()));
}

fn write_attribute(out: &mut String, attribute: dom::Attribute<'_>) {
    out.push_str(&qualified(
        attribute.preferred_prefix(),
        attribute.name().local_part(),
    ));
    out.push_str("=\"");
    out.push_str(&escape_attr(attribute.value()));
    out.push('"');
}

fn write_text(out: &mut String, text: dom::Text<'_>, kind: ParserKind) {
    let raw = kind == ParserKind::Html
        && text
            .parent()
            .map(|p| HTML_RAW_TEXT_ELEMENTS.contains(&p.name().local_part()))
            .unwrap_or(false);
    if raw {
        out.push_str(text.text());
    } else {
        out.push_str(&escape_text(text.text()));
    }
}

fn write_comment(out: &mut String, comment: dom::Comment<'_>) {
    out.push_str("<!--");
    out.push_str(comment.text());
    out.push_str("-->");
}

fn write_pi(out: &mut String, pi: dom::ProcessingInstruction<'_>) {
    out.push_str("<?");
    out.push_str(pi.target());
    if let Some(value) = pi.value() {
        out.push(' ');
        out.push_str(value);
    }
    out.push_str("?>");
}

fn qualified(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(p) => format!("{}:{}", p, local),
        None => local.to_string(),
    }
}

fn is_html_void(name: &str) -> bool {
    HTML_VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
