//! Rendering of editor lines (paragraphs and headings) made of text runs.

use crate::blocks::{Hyperlink, Line, Run};
use crate::compiler::Compiler;
use crate::error::CompileResult;
use crate::markup::{escape_attr, indent};
use crate::node::Node;
use crate::style::{to_css, Declaration, LineType, TextStyle};

/// Render every non-empty line at `level`. `forced_type` overrides the type
/// declared on each line (headings render all their lines at one level).
pub fn render_lines(
    compiler: &Compiler<'_>,
    node: &Node,
    lines: &[Line],
    forced_type: Option<LineType>,
    link_styles: &TextStyle,
    level: usize,
) -> CompileResult<Vec<String>> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let line_type = forced_type.unwrap_or(line.line_type);
        if let Some(html) = render_line(compiler, node, line, line_type, link_styles)? {
            out.push(format!("{}{}", indent(level), html));
        }
    }
    Ok(out)
}

/// One line wrapped in its semantic tag, or `None` when every run is empty
pub fn render_line(
    compiler: &Compiler<'_>,
    node: &Node,
    line: &Line,
    line_type: LineType,
    link_styles: &TextStyle,
) -> CompileResult<Option<String>> {
    let mut body = String::new();
    for run in &line.children {
        let text = compiler.render_text(node, &run.text)?;
        if text.is_empty() {
            continue;
        }
        body.push_str(&format_run(compiler, run, &text, link_styles));
    }
    if body.is_empty() {
        return Ok(None);
    }

    let tag = line_type.html_tag();
    let css = to_css(&compiler.styles().for_line(line_type).line_declarations());
    Ok(Some(format!(
        "<{} style=\"{}\">{}</{}>",
        tag,
        escape_attr(&css),
        body,
        tag
    )))
}

fn format_run(compiler: &Compiler<'_>, run: &Run, text: &str, link_styles: &TextStyle) -> String {
    if let Some(link) = run.hyperlink.as_ref().filter(|l| !l.url.trim().is_empty()) {
        return format_link(compiler, run, link, text, link_styles);
    }
    if run.has_overrides() {
        let css = to_css(&span_declarations(run));
        return format!("<span style=\"{}\">{}</span>", escape_attr(&css), text);
    }
    text.to_string()
}

fn format_link(
    compiler: &Compiler<'_>,
    run: &Run,
    link: &Hyperlink,
    text: &str,
    link_styles: &TextStyle,
) -> String {
    let href = compiler.tracking().resolve(&link.url, link.disable_tracking);
    let css = to_css(&link_declarations(run, link_styles, &compiler.styles().hyperlink));
    format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" style=\"{}\">{}</a>",
        escape_attr(&href),
        escape_attr(&css),
        text
    )
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// First present value in priority order
fn first<'a>(candidates: [Option<&'a str>; 3]) -> Option<&'a str> {
    candidates.into_iter().flatten().next()
}

/// Inline style of a hyperlink run. Each property resolves on its own: the
/// run's override, then the block's link style, then the document default.
fn link_declarations(run: &Run, block: &TextStyle, root: &TextStyle) -> Vec<Declaration> {
    let run_weight = if run.bold { Some("bold") } else { filled(&run.font_weight) };
    let run_style = if run.italic { Some("italic") } else { filled(&run.font_style) };

    let mut out = Vec::new();
    let properties: [(&'static str, Option<&str>, &Option<String>, &Option<String>); 5] = [
        ("color", filled(&run.font_color), &block.color, &root.color),
        ("font-family", filled(&run.font_family), &block.font_family, &root.font_family),
        ("font-size", filled(&run.font_size), &block.font_size, &root.font_size),
        ("font-weight", run_weight, &block.font_weight, &root.font_weight),
        ("font-style", run_style, &block.font_style, &root.font_style),
    ];
    for (name, own, block_value, root_value) in properties {
        if let Some(v) = first([own, filled(block_value), filled(root_value)]) {
            out.push((name, v.to_string()));
        }
    }

    let decoration = first([None, filled(&block.text_decoration), filled(&root.text_decoration)]);
    let underline = run.underline != Some(false) && decoration != Some("none");
    out.push((
        "text-decoration",
        if underline { "underline" } else { "none" }.to_string(),
    ));

    if let Some(v) = first([None, filled(&block.text_transform), filled(&root.text_transform)]) {
        out.push(("text-transform", v.to_string()));
    }
    out
}

/// Inline style of a formatted, non-link run: only the overrides it carries
fn span_declarations(run: &Run) -> Vec<Declaration> {
    let mut out = Vec::new();
    if run.bold {
        out.push(("font-weight", "bold".to_string()));
    } else if let Some(w) = filled(&run.font_weight) {
        out.push(("font-weight", w.to_string()));
    }
    if run.italic {
        out.push(("font-style", "italic".to_string()));
    } else if let Some(s) = filled(&run.font_style) {
        out.push(("font-style", s.to_string()));
    }
    if run.underline == Some(true) {
        out.push(("text-decoration", "underline".to_string()));
    }
    if let Some(c) = filled(&run.font_color) {
        out.push(("color", c.to_string()));
    }
    if let Some(s) = filled(&run.font_size) {
        out.push(("font-size", s.to_string()));
    }
    if let Some(f) = filled(&run.font_family) {
        out.push(("font-family", f.to_string()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::RootStyles;
    use crate::template::JinjaEngine;
    use crate::tracking::TrackingConfig;
    use serde_json::{json, Value};

    fn styles() -> RootStyles {
        serde_json::from_value(json!({
            "paragraph": { "color": "#222222", "fontSize": "16px" },
            "h2": { "fontSize": "24px", "fontWeight": "700", "marginControl": "all", "margin": "0 0 8px" },
            "hyperlink": { "color": "#0000ee", "fontFamily": "Arial", "textTransform": "none" }
        }))
        .unwrap()
    }

    fn render(run: Run, link_styles: &TextStyle) -> Option<String> {
        let styles = styles();
        let data: Value = json!({ "first_name": "Ada" });
        let tracking = TrackingConfig {
            utm_source: Some("mail".to_string()),
            ..TrackingConfig::default()
        };
        let engine = JinjaEngine::new();
        let compiler = Compiler::new(&styles, &data, &tracking, &engine);
        let node = Node::new("t", "text", Value::Null);
        let line = Line {
            line_type: LineType::Paragraph,
            children: vec![run],
        };
        render_line(&compiler, &node, &line, LineType::Paragraph, link_styles).unwrap()
    }

    #[test]
    fn test_plain_run_is_escaped() {
        assert_eq!(
            render(Run::plain("Fish & <Chips>"), &TextStyle::default()).unwrap(),
            r#"<p style="color:#222222;font-size:16px;margin:0">Fish &amp; &lt;Chips&gt;</p>"#
        );
    }

    #[test]
    fn test_templated_run_is_interpolated() {
        assert_eq!(
            render(Run::plain("Hi {{ first_name }}"), &TextStyle::default()).unwrap(),
            r#"<p style="color:#222222;font-size:16px;margin:0">Hi Ada</p>"#
        );
    }

    #[test]
    fn test_formatting_span() {
        let run = Run {
            bold: true,
            font_weight: Some("300".to_string()),
            font_style: Some("oblique".to_string()),
            font_color: Some("#ff0000".to_string()),
            ..Run::plain("Sale")
        };
        let html = render(run, &TextStyle::default()).unwrap();
        assert!(html.contains(
            r#"<span style="font-weight:bold;font-style:oblique;color:#ff0000">Sale</span>"#
        ));
    }

    #[test]
    fn test_link_color_precedence() {
        let block_links = TextStyle {
            color: Some("#00aa00".to_string()),
            ..TextStyle::default()
        };

        let own = Run {
            font_color: Some("#aa0000".to_string()),
            hyperlink: Some(Hyperlink {
                url: "https://example.com".to_string(),
                disable_tracking: false,
            }),
            ..Run::plain("link")
        };
        assert!(render(own.clone(), &block_links).unwrap().contains("color:#aa0000"));

        let from_block = Run {
            font_color: None,
            ..own.clone()
        };
        assert!(render(from_block.clone(), &block_links).unwrap().contains("color:#00aa00"));

        let html = render(from_block, &TextStyle::default()).unwrap();
        assert!(html.contains("color:#0000ee"));
        assert!(html.contains("font-family:Arial"));
    }

    #[test]
    fn test_link_is_tracked_and_not_wrapped_in_span() {
        let run = Run {
            bold: true,
            hyperlink: Some(Hyperlink {
                url: "https://example.com".to_string(),
                disable_tracking: false,
            }),
            ..Run::plain("Shop")
        };
        let html = render(run, &TextStyle::default()).unwrap();
        assert!(!html.contains("<span"));
        assert!(html.contains(
            r#"<a href="https://example.com?utm_source=mail" target="_blank" rel="noopener noreferrer" style="color:#0000ee;font-family:Arial;font-weight:bold;text-decoration:underline;text-transform:none">Shop</a>"#
        ));
    }

    #[test]
    fn test_link_underline_rules() {
        let link = Some(Hyperlink {
            url: "https://example.com".to_string(),
            disable_tracking: true,
        });
        let opted_out = Run {
            underline: Some(false),
            hyperlink: link.clone(),
            ..Run::plain("a")
        };
        let html = render(opted_out, &TextStyle::default()).unwrap();
        assert!(html.contains("text-decoration:none"));
        assert!(html.contains(r#"href="https://example.com""#));

        let block_none = TextStyle {
            text_decoration: Some("none".to_string()),
            ..TextStyle::default()
        };
        let html = render(
            Run {
                hyperlink: link,
                ..Run::plain("b")
            },
            &block_none,
        )
        .unwrap();
        assert!(html.contains("text-decoration:none"));
    }

    #[test]
    fn test_empty_line_is_omitted() {
        assert_eq!(render(Run::plain(""), &TextStyle::default()), None);
        assert_eq!(render(Run::plain("{{ missing }}"), &TextStyle::default()), None);
    }

    #[test]
    fn test_forced_heading_type() {
        let styles = styles();
        let data = json!({});
        let tracking = TrackingConfig::default();
        let engine = JinjaEngine::new();
        let compiler = Compiler::new(&styles, &data, &tracking, &engine);
        let node = Node::new("h", "heading", Value::Null);
        let lines = vec![Line {
            line_type: LineType::Paragraph,
            children: vec![Run::plain("Title")],
        }];
        let out = render_lines(
            &compiler,
            &node,
            &lines,
            Some(LineType::H2),
            &TextStyle::default(),
            2,
        )
        .unwrap();
        assert_eq!(
            out,
            vec![r#"    <h2 style="font-size:24px;font-weight:700;margin:0 0 8px">Title</h2>"#.to_string()]
        );
    }
}
