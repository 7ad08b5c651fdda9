//! Recursive translation of a block tree into MJML.

use crate::blocks::{
    Block, ButtonData, ColumnData, DividerData, HeadingData, ImageData, RootData, SectionData,
    SpacerData, TextData, Wrapper,
};
use crate::error::{CompileError, CompileResult};
use crate::markup::{escape_html, indent, indent_lines, join_fragments, Tag};
use crate::node::{Layout, Node};
use crate::rich_text;
use crate::style::RootStyles;
use crate::template::{has_markers, parse_template_data, JinjaEngine, TemplateEngine};
use crate::tracking::TrackingConfig;
use serde_json::Value;

/// Invisible 1x1 image used for open tracking. The sending layer fills in the
/// `tracking_opens_url` placeholder.
const OPEN_TRACKING_PIXEL: &str = r#"<img src="{{ tracking_opens_url }}" alt="" width="1" height="1" style="display:block;width:1px;height:1px;border:0;" />"#;

/// Position of a column inside a fixed-ratio layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSlot {
    pub layout: Layout,
    pub index: usize,
}

impl ColumnSlot {
    pub fn width(self) -> Option<&'static str> {
        self.layout.column_width(self.index)
    }
}

/// Read-only context shared by every recursive call of one compile
pub struct Compiler<'a> {
    styles: &'a RootStyles,
    data: &'a Value,
    tracking: &'a TrackingConfig,
    engine: &'a dyn TemplateEngine,
}

impl<'a> Compiler<'a> {
    pub fn new(
        styles: &'a RootStyles,
        data: &'a Value,
        tracking: &'a TrackingConfig,
        engine: &'a dyn TemplateEngine,
    ) -> Self {
        Self {
            styles,
            data,
            tracking,
            engine,
        }
    }

    pub fn styles(&self) -> &RootStyles {
        self.styles
    }

    pub fn tracking(&self) -> &TrackingConfig {
        self.tracking
    }

    /// Compile `node` and its subtree at `level`. `slot` is set when the node
    /// is a direct child of a column layout.
    pub fn compile(&self, node: &Node, level: usize, slot: Option<ColumnSlot>) -> CompileResult<String> {
        let block = Block::decode(node)?;
        self.compile_block(node, &block, level, slot)
    }

    /// Compile a node whose payload has already been decoded
    pub fn compile_block(
        &self,
        node: &Node,
        block: &Block,
        level: usize,
        slot: Option<ColumnSlot>,
    ) -> CompileResult<String> {
        log::debug!("compiling block {} ({})", node.id, node.kind);
        match block {
            Block::Root(data) => self.compile_root(node, data, level),
            Block::Section(layout, data) => self.compile_section(node, *layout, data, level),
            Block::Column(data) => self.compile_column(node, data, level, slot),
            Block::Text(data) => self.compile_text(node, data, level),
            Block::Heading(data) => self.compile_heading(node, data, level),
            Block::Button(data) => self.compile_button(node, data, level),
            Block::Image(data) => Ok(self.compile_image(data, level)),
            Block::Divider(data) => Ok(compile_divider(data, level)),
            Block::Spacer(data) => Ok(compile_spacer(data, level)),
            Block::Liquid(data) => {
                let raw = self.render_template(node, &data.code)?;
                Ok(indent_lines(&raw, level))
            }
            Block::OpenTracking => {
                let pixel = format!("{}{}", indent(level + 1), OPEN_TRACKING_PIXEL);
                Ok(Tag::new("mj-raw").render_with_body(level, &pixel))
            }
            Block::Unsupported(kind) => {
                log::warn!("block {} has unsupported kind '{}'", node.id, kind);
                Ok(format!("{}<!-- unsupported block kind: {} -->", indent(level), kind))
            }
        }
    }

    fn compile_children(
        &self,
        node: &Node,
        level: usize,
        layout: Option<Layout>,
    ) -> CompileResult<Vec<String>> {
        node.children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let slot = layout.map(|layout| ColumnSlot { layout, index });
                self.compile(child, level, slot)
            })
            .collect()
    }

    /// Interpolates text containing template markers, escapes everything else
    pub fn render_text(&self, node: &Node, text: &str) -> CompileResult<String> {
        if has_markers(text) {
            self.render_template(node, text)
        } else {
            Ok(escape_html(text))
        }
    }

    fn render_template(&self, node: &Node, template: &str) -> CompileResult<String> {
        self.engine
            .render(template, self.data)
            .map_err(|e| CompileError::TemplateRender {
                id: node.id.clone(),
                kind: node.kind.clone(),
                reason: e.to_string(),
            })
    }

    fn compile_root(&self, node: &Node, data: &RootData, level: usize) -> CompileResult<String> {
        let children = self.compile_children(node, level + 2, None)?;
        let body_style = &data.styles.body;
        let mut body = Tag::new("mj-body");
        body.attr("width", body_style.width.as_deref())
            .attr("background-color", body_style.background_color.as_deref());

        let content = join_fragments(&children);
        let body_markup = if content.is_empty() {
            body.render_empty(level + 1)
        } else {
            body.render_with_body(level + 1, &content)
        };
        Ok(Tag::new("mjml").render_with_body(level, &body_markup))
    }

    fn compile_section(
        &self,
        node: &Node,
        layout: Layout,
        data: &SectionData,
        level: usize,
    ) -> CompileResult<String> {
        let mut section = Tag::new("mj-section");
        section
            .attr("background-color", data.background_color.as_deref())
            .attr("full-width", data.full_width.then_some("full-width"))
            .attr("text-align", data.text_align.as_deref())
            .attrs(data.padding.outer_declarations())
            .attrs(data.border.declarations())
            .attrs(data.border.radius());

        if data.columns_on_mobile {
            let columns = self.compile_children(node, level + 2, Some(layout))?;
            let group = Tag::new("mj-group").render_children(level + 1, &columns);
            if group.is_empty() {
                return Ok(String::new());
            }
            return Ok(section.render_with_body(level, &group));
        }

        let columns = self.compile_children(node, level + 1, Some(layout))?;
        Ok(section.render_children(level, &columns))
    }

    fn compile_column(
        &self,
        node: &Node,
        data: &ColumnData,
        level: usize,
        slot: Option<ColumnSlot>,
    ) -> CompileResult<String> {
        let mut column = Tag::new("mj-column");
        column
            .attr("width", slot.and_then(ColumnSlot::width))
            .attr("vertical-align", data.vertical_align.as_deref())
            .attr("background-color", data.background_color.as_deref())
            .attrs(data.padding.declarations())
            .attrs(data.border.declarations())
            .attrs(data.border.radius());

        let children = self.compile_children(node, level + 1, None)?;
        Ok(column.render_children(level, &children))
    }

    fn compile_text(&self, node: &Node, data: &TextData, level: usize) -> CompileResult<String> {
        let lines = rich_text::render_lines(
            self,
            node,
            &data.editor_data,
            None,
            &data.hyperlink_styles,
            level + 1,
        )?;
        Ok(text_tag(&data.wrapper, level, &lines))
    }

    fn compile_heading(&self, node: &Node, data: &HeadingData, level: usize) -> CompileResult<String> {
        let lines = rich_text::render_lines(
            self,
            node,
            &data.editor_data,
            Some(data.heading_type),
            &data.hyperlink_styles,
            level + 1,
        )?;
        Ok(text_tag(&data.wrapper, level, &lines))
    }

    fn compile_button(&self, node: &Node, data: &ButtonData, level: usize) -> CompileResult<String> {
        let label = self.render_text(node, &data.text)?;
        if label.trim().is_empty() {
            return Ok(String::new());
        }
        let href = data
            .href
            .as_deref()
            .map(|url| self.tracking.resolve(url, data.disable_tracking));

        let mut button = Tag::new("mj-button");
        button
            .attr("href", href.as_deref())
            .attr("background-color", data.background_color.as_deref())
            .attr("color", data.color.as_deref())
            .attr("font-family", data.font_family.as_deref())
            .attr("font-size", data.font_size.as_deref())
            .attr("font-weight", data.font_weight.as_deref())
            .attr("font-style", data.font_style.as_deref())
            .attr("text-transform", data.text_transform.as_deref())
            .attr("inner-padding", data.inner_padding.as_deref())
            .attr("width", data.width.as_deref())
            .attrs(data.border.declarations())
            .attrs(data.border.radius())
            .attr("align", data.wrapper.align.as_deref())
            .attr("container-background-color", data.wrapper.background_color.as_deref())
            .attrs(data.wrapper.padding.outer_declarations());
        Ok(button.render_inline(level, &label))
    }

    fn compile_image(&self, data: &ImageData, level: usize) -> String {
        if data.src.trim().is_empty() {
            return String::new();
        }
        let href = data
            .href
            .as_deref()
            .map(|url| self.tracking.resolve(url, data.disable_tracking));

        let mut image = Tag::new("mj-image");
        image
            .attr("src", Some(&data.src))
            .attr("alt", data.alt.as_deref())
            .attr("href", href.as_deref())
            .attr("width", data.width.as_deref())
            .attr("height", data.height.as_deref())
            .attrs(data.border.declarations())
            .attrs(data.border.radius())
            .attr("align", data.wrapper.align.as_deref())
            .attr("container-background-color", data.wrapper.background_color.as_deref())
            .attrs(data.wrapper.padding.outer_declarations());
        image.render_empty(level)
    }
}

fn text_tag(wrapper: &Wrapper, level: usize, lines: &[String]) -> String {
    let mut text = Tag::new("mj-text");
    text.attr("align", Some(wrapper.align.as_deref().unwrap_or("left")))
        .attrs(wrapper.padding.outer_declarations())
        .attr("container-background-color", wrapper.background_color.as_deref());
    text.render_children(level, lines)
}

fn compile_divider(data: &DividerData, level: usize) -> String {
    let mut divider = Tag::new("mj-divider");
    divider
        .attr("border-style", data.border_style.as_deref())
        .attr("border-width", data.border_width.as_deref())
        .attr("border-color", data.border_color.as_deref())
        .attr("width", data.width.as_deref())
        .attr("align", data.wrapper.align.as_deref())
        .attr("container-background-color", data.wrapper.background_color.as_deref())
        .attrs(data.wrapper.padding.outer_declarations());
    divider.render_empty(level)
}

fn compile_spacer(data: &SpacerData, level: usize) -> String {
    let mut spacer = Tag::new("mj-spacer");
    spacer
        .attr("height", data.height.as_deref())
        .attr("container-background-color", data.wrapper.background_color.as_deref())
        .attrs(data.wrapper.padding.outer_declarations());
    spacer.render_empty(level)
}

/// Compile a document tree with the default template engine.
///
/// `template_data` is the JSON object exposed to `{{ }}` expressions; blank
/// means no data.
pub fn tree_to_mjml(
    root: &Node,
    template_data: Option<&str>,
    tracking: &TrackingConfig,
) -> CompileResult<String> {
    tree_to_mjml_with_engine(root, template_data, tracking, &JinjaEngine::new(), 0)
}

/// Compile a document tree with a caller-supplied template engine, starting at
/// indentation `level`. Root styles come from `root` when it is a root block.
pub fn tree_to_mjml_with_engine(
    root: &Node,
    template_data: Option<&str>,
    tracking: &TrackingConfig,
    engine: &dyn TemplateEngine,
    level: usize,
) -> CompileResult<String> {
    let data = parse_template_data(template_data).map_err(|e| CompileError::InvalidTemplateData {
        id: root.id.clone(),
        kind: root.kind.clone(),
        reason: e.to_string(),
    })?;
    let block = Block::decode(root)?;
    let default_styles = RootStyles::default();
    let styles = match &block {
        Block::Root(root_data) => &root_data.styles,
        _ => &default_styles,
    };
    Compiler::new(styles, &data, tracking, engine).compile_block(root, &block, level, None)
}
