//! MJML tag assembly: attributes, indentation, escaping.

use crate::style::Declaration;
use std::fmt::Write;

const INDENT: &str = "  ";

pub fn indent(level: usize) -> String {
    INDENT.repeat(level)
}

/// Escapes attribute values; single quotes are left alone so CSS font lists
/// stay readable
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Builder for one MJML element
#[derive(Debug, Clone, Default)]
pub struct Tag {
    name: &'static str,
    attributes: Vec<Declaration>,
}

impl Tag {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute when the value is present and non-blank
    pub fn attr(&mut self, name: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.attributes.push((name, v.to_string()));
        }
        self
    }

    pub fn attrs(&mut self, declarations: impl IntoIterator<Item = Declaration>) -> &mut Self {
        self.attributes.extend(declarations);
        self
    }

    fn open(&self) -> String {
        let mut out = format!("<{}", self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }
        out
    }

    /// `<name attrs />` at the given level
    pub fn render_empty(&self, level: usize) -> String {
        format!("{}{} />", indent(level), self.open())
    }

    /// `<name attrs>content</name>` on a single line
    pub fn render_inline(&self, level: usize, content: &str) -> String {
        format!("{}{}>{}</{}>", indent(level), self.open(), content, self.name)
    }

    /// Wraps already indented body lines; the body is emitted as-is
    pub fn render_with_body(&self, level: usize, body: &str) -> String {
        let pad = indent(level);
        format!("{}{}>\n{}\n{}</{}>", pad, self.open(), body, pad, self.name)
    }

    /// Wraps child fragments, dropping empty ones. Returns an empty string when
    /// nothing is left to wrap.
    pub fn render_children(&self, level: usize, children: &[String]) -> String {
        let body = join_fragments(children);
        if body.is_empty() {
            return String::new();
        }
        self.render_with_body(level, &body)
    }
}

/// Prefixes every non-blank line of a raw fragment with `level` indentation.
/// Blank lines are emptied.
pub fn indent_lines(text: &str, level: usize) -> String {
    let pad = indent(level);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins non-empty fragments in order, one per line
pub fn join_fragments(fragments: &[String]) -> String {
    fragments
        .iter()
        .filter(|f| !f.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}
