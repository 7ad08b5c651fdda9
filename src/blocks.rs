use crate::error::{CompileError, CompileResult};
use crate::node::{BlockKind, Layout, Node};
use crate::style::{Border, LineType, Padding, RootStyles, TextStyle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A node's payload decoded for its kind
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Root(RootData),
    Section(Layout, SectionData),
    Column(ColumnData),
    Text(TextData),
    Heading(HeadingData),
    Button(ButtonData),
    Image(ImageData),
    Divider(DividerData),
    Spacer(SpacerData),
    Liquid(LiquidData),
    OpenTracking,
    Unsupported(String),
}

impl Block {
    /// Decode `node.data` into the payload its kind requires. A missing
    /// payload yields the kind's defaults; a mismatched one is an error.
    pub fn decode(node: &Node) -> CompileResult<Block> {
        let block = match node.block_kind() {
            BlockKind::Root => Block::Root(payload(node)?),
            BlockKind::Section(layout) => Block::Section(layout, payload(node)?),
            BlockKind::Column => Block::Column(payload(node)?),
            BlockKind::Text => Block::Text(payload(node)?),
            BlockKind::Heading => Block::Heading(payload(node)?),
            BlockKind::Button => Block::Button(payload(node)?),
            BlockKind::Image => Block::Image(payload(node)?),
            BlockKind::Divider => Block::Divider(payload(node)?),
            BlockKind::Spacer => Block::Spacer(payload(node)?),
            BlockKind::Liquid => Block::Liquid(payload(node)?),
            BlockKind::OpenTracking => Block::OpenTracking,
            BlockKind::Unsupported(tag) => Block::Unsupported(tag),
        };
        Ok(block)
    }
}

fn payload<T: DeserializeOwned + Default>(node: &Node) -> CompileResult<T> {
    if node.data.is_null() {
        return Ok(T::default());
    }
    T::deserialize(&node.data).map_err(|e| CompileError::InvalidBlockData {
        id: node.id.clone(),
        kind: node.kind.clone(),
        reason: e.to_string(),
    })
}

/// Outer box shared by content blocks: alignment, background and padding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Wrapper {
    pub align: Option<String>,
    pub background_color: Option<String>,
    #[serde(flatten)]
    pub padding: Padding,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootData {
    pub styles: RootStyles,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionData {
    /// Keep the columns side by side on small screens by grouping them
    pub columns_on_mobile: bool,
    pub background_color: Option<String>,
    pub full_width: bool,
    pub text_align: Option<String>,
    #[serde(flatten)]
    pub padding: Padding,
    #[serde(flatten)]
    pub border: Border,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnData {
    pub vertical_align: Option<String>,
    pub background_color: Option<String>,
    #[serde(flatten)]
    pub padding: Padding,
    #[serde(flatten)]
    pub border: Border,
}

/// Link target of a text run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hyperlink {
    pub url: String,
    pub disable_tracking: bool,
}

/// One formatted span of text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// `Some(false)` removes the default underline of a hyperlink
    pub underline: Option<bool>,
    pub font_size: Option<String>,
    pub font_color: Option<String>,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub hyperlink: Option<Hyperlink>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// True when any formatting beyond plain text is requested
    pub fn has_overrides(&self) -> bool {
        self.bold
            || self.italic
            || self.underline == Some(true)
            || [
                &self.font_size,
                &self.font_color,
                &self.font_family,
                &self.font_weight,
                &self.font_style,
            ]
            .iter()
            .any(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

/// A paragraph or heading line made of runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Line {
    #[serde(rename = "type")]
    pub line_type: LineType,
    pub children: Vec<Run>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextData {
    pub editor_data: Vec<Line>,
    pub hyperlink_styles: TextStyle,
    pub wrapper: Wrapper,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingData {
    /// Level applied to every line of the heading
    #[serde(rename = "type")]
    pub heading_type: LineType,
    pub editor_data: Vec<Line>,
    pub hyperlink_styles: TextStyle,
    pub wrapper: Wrapper,
}

impl Default for HeadingData {
    fn default() -> Self {
        Self {
            heading_type: LineType::H1,
            editor_data: Vec::new(),
            hyperlink_styles: TextStyle::default(),
            wrapper: Wrapper::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonData {
    pub text: String,
    pub href: Option<String>,
    pub disable_tracking: bool,
    pub background_color: Option<String>,
    pub color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub text_transform: Option<String>,
    pub inner_padding: Option<String>,
    pub width: Option<String>,
    #[serde(flatten)]
    pub border: Border,
    pub wrapper: Wrapper,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageData {
    pub src: String,
    pub alt: Option<String>,
    pub href: Option<String>,
    pub disable_tracking: bool,
    pub width: Option<String>,
    pub height: Option<String>,
    #[serde(flatten)]
    pub border: Border,
    pub wrapper: Wrapper,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividerData {
    pub border_style: Option<String>,
    pub border_width: Option<String>,
    pub border_color: Option<String>,
    pub width: Option<String>,
    pub wrapper: Wrapper,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpacerData {
    pub height: Option<String>,
    pub wrapper: Wrapper,
}

/// Raw template code emitted after interpolation, without escaping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidData {
    pub code: String,
}
