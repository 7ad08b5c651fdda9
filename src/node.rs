use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One element of an editor document tree, as stored by the authoring layer.
///
/// `data` stays untyped here; [`crate::blocks::Block::decode`] turns it into the
/// payload for `kind` exactly once per compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            data,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn block_kind(&self) -> BlockKind {
        BlockKind::from_tag(&self.kind)
    }
}

/// Fixed-ratio column layouts. The suffix of each wire tag lists the column
/// spans on a 24 unit grid (`columns168` is 16 + 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    OneColumn,
    Columns1212,
    Columns168,
    Columns816,
    Columns204,
    Columns420,
    Columns888,
    Columns6666,
}

impl Layout {
    pub const ALL: [Layout; 8] = [
        Layout::OneColumn,
        Layout::Columns1212,
        Layout::Columns168,
        Layout::Columns816,
        Layout::Columns204,
        Layout::Columns420,
        Layout::Columns888,
        Layout::Columns6666,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Layout::OneColumn => "oneColumn",
            Layout::Columns1212 => "columns1212",
            Layout::Columns168 => "columns168",
            Layout::Columns816 => "columns816",
            Layout::Columns204 => "columns204",
            Layout::Columns420 => "columns420",
            Layout::Columns888 => "columns888",
            Layout::Columns6666 => "columns6666",
        }
    }

    /// Rendered widths of the layout's columns, in order. An empty slice means
    /// the renderer picks the width.
    pub fn column_widths(self) -> &'static [&'static str] {
        match self {
            Layout::OneColumn => &[],
            Layout::Columns1212 => &["50%", "50%"],
            Layout::Columns168 => &["66.66%", "33.33%"],
            Layout::Columns816 => &["33.33%", "66.66%"],
            Layout::Columns204 => &["83.33%", "16.66%"],
            Layout::Columns420 => &["16.66%", "83.33%"],
            Layout::Columns888 => &["33.33%", "33.33%", "33.33%"],
            Layout::Columns6666 => &["25%", "25%", "25%", "25%"],
        }
    }

    pub fn column_width(self, index: usize) -> Option<&'static str> {
        self.column_widths().get(index).copied()
    }
}

/// Closed set of block kinds understood by the compiler
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Root,
    Section(Layout),
    Column,
    Text,
    Heading,
    Button,
    Image,
    Divider,
    Spacer,
    Liquid,
    OpenTracking,
    /// Any tag this compiler does not know; rendered as a placeholder comment
    Unsupported(String),
}

impl BlockKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "root" => BlockKind::Root,
            "column" => BlockKind::Column,
            "text" => BlockKind::Text,
            "heading" => BlockKind::Heading,
            "button" => BlockKind::Button,
            "image" => BlockKind::Image,
            "divider" => BlockKind::Divider,
            "spacer" => BlockKind::Spacer,
            "liquid" => BlockKind::Liquid,
            "openTracking" => BlockKind::OpenTracking,
            other => Layout::ALL
                .iter()
                .find(|layout| layout.tag() == other)
                .map(|layout| BlockKind::Section(*layout))
                .unwrap_or_else(|| BlockKind::Unsupported(other.to_string())),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            BlockKind::Root => "root",
            BlockKind::Section(layout) => layout.tag(),
            BlockKind::Column => "column",
            BlockKind::Text => "text",
            BlockKind::Heading => "heading",
            BlockKind::Button => "button",
            BlockKind::Image => "image",
            BlockKind::Divider => "divider",
            BlockKind::Spacer => "spacer",
            BlockKind::Liquid => "liquid",
            BlockKind::OpenTracking => "openTracking",
            BlockKind::Unsupported(tag) => tag,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
