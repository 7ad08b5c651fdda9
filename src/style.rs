use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A resolved style declaration: attribute name / CSS property and its value
pub type Declaration = (&'static str, String);

/// How a padding, margin or border group is specified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ControlMode {
    /// One shorthand value for every side
    All,
    /// Four independent side values
    Separate,
    /// Absent or unrecognized; behaves like `All`
    #[default]
    Unset,
}

impl From<Option<String>> for ControlMode {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("all") => ControlMode::All,
            Some("separate") => ControlMode::Separate,
            _ => ControlMode::Unset,
        }
    }
}

impl From<ControlMode> for Option<String> {
    fn from(mode: ControlMode) -> Self {
        match mode {
            ControlMode::All => Some("all".to_string()),
            ControlMode::Separate => Some("separate".to_string()),
            ControlMode::Unset => None,
        }
    }
}

/// Padding group as stored on block payloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    #[serde(rename = "paddingControl")]
    pub control: ControlMode,
    #[serde(rename = "padding", skip_serializing_if = "Option::is_none")]
    pub all: Option<String>,
    #[serde(rename = "paddingTop", skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(rename = "paddingRight", skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(rename = "paddingBottom", skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(rename = "paddingLeft", skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
}

/// Margin group; same shape as [`Padding`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    #[serde(rename = "marginControl")]
    pub control: ControlMode,
    #[serde(rename = "margin", skip_serializing_if = "Option::is_none")]
    pub all: Option<String>,
    #[serde(rename = "marginTop", skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(rename = "marginRight", skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(rename = "marginBottom", skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(rename = "marginLeft", skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
}

/// Border group: a shorthand (style/width/color), four sides, and a radius
/// that is independent of the control mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Border {
    #[serde(rename = "borderControl")]
    pub control: ControlMode,
    pub border_style: Option<String>,
    pub border_width: Option<String>,
    pub border_color: Option<String>,
    pub border_top_style: Option<String>,
    pub border_top_width: Option<String>,
    pub border_top_color: Option<String>,
    pub border_right_style: Option<String>,
    pub border_right_width: Option<String>,
    pub border_right_color: Option<String>,
    pub border_bottom_style: Option<String>,
    pub border_bottom_width: Option<String>,
    pub border_bottom_color: Option<String>,
    pub border_left_style: Option<String>,
    pub border_left_width: Option<String>,
    pub border_left_color: Option<String>,
    pub border_radius: Option<String>,
}

/// Typography and spacing defaults for one semantic tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_style: Option<String>,
    pub font_weight: Option<String>,
    pub line_height: Option<String>,
    pub letter_spacing: Option<String>,
    pub text_decoration: Option<String>,
    pub text_transform: Option<String>,
    #[serde(flatten)]
    pub padding: Padding,
    #[serde(flatten)]
    pub margin: Margin,
}

/// Body defaults; adds the envelope width and background to the text fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyStyle {
    pub width: Option<String>,
    pub background_color: Option<String>,
    #[serde(flatten)]
    pub text: TextStyle,
}

/// Document-wide defaults taken from the root block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootStyles {
    pub body: BodyStyle,
    pub h1: TextStyle,
    pub h2: TextStyle,
    pub h3: TextStyle,
    pub paragraph: TextStyle,
    pub hyperlink: TextStyle,
}

/// Semantic type of a rich text line; anything but a heading is a paragraph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum LineType {
    #[default]
    Paragraph,
    H1,
    H2,
    H3,
}

impl From<Option<String>> for LineType {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("h1") => LineType::H1,
            Some("h2") => LineType::H2,
            Some("h3") => LineType::H3,
            _ => LineType::Paragraph,
        }
    }
}

impl From<LineType> for Option<String> {
    fn from(line_type: LineType) -> Self {
        let tag = match line_type {
            LineType::Paragraph => "paragraph",
            other => other.html_tag(),
        };
        Some(tag.to_string())
    }
}

impl LineType {
    pub fn html_tag(self) -> &'static str {
        match self {
            LineType::Paragraph => "p",
            LineType::H1 => "h1",
            LineType::H2 => "h2",
            LineType::H3 => "h3",
        }
    }
}

impl RootStyles {
    pub fn for_line(&self, line_type: LineType) -> &TextStyle {
        match line_type {
            LineType::Paragraph => &self.paragraph,
            LineType::H1 => &self.h1,
            LineType::H2 => &self.h2,
            LineType::H3 => &self.h3,
        }
    }
}

/// True for values such as `0`, `0px`, `0.0em` or `0%`
pub fn is_zero_length(value: &str) -> bool {
    static LENGTH_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = LENGTH_REGEX
        .get_or_init(|| Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+))\s*([a-zA-Z%]*)$").unwrap());
    re.captures(value.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|number| number.as_str().parse::<f64>().ok())
        .map(|n| n == 0.0)
        .unwrap_or(false)
}

/// Present, non-blank and not a zero length
fn non_zero(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !is_zero_length(v))
}

/// Present, non-blank, non-zero and not a `none`/`normal` sentinel
fn renderable(value: &Option<String>) -> Option<&str> {
    non_zero(value).filter(|v| *v != "none" && *v != "normal")
}

fn resolve_sides(
    control: ControlMode,
    all: &Option<String>,
    sides: [&Option<String>; 4],
    names: [&'static str; 5],
) -> Vec<Declaration> {
    let mut out = Vec::new();
    match control {
        ControlMode::Separate => {
            for (value, name) in sides.iter().zip(&names[1..]) {
                if let Some(v) = non_zero(value) {
                    out.push((*name, v.to_string()));
                }
            }
        }
        ControlMode::All | ControlMode::Unset => {
            if let Some(v) = non_zero(all) {
                out.push((names[0], v.to_string()));
            }
        }
    }
    out
}

impl Padding {
    pub fn declarations(&self) -> Vec<Declaration> {
        resolve_sides(
            self.control,
            &self.all,
            [&self.top, &self.right, &self.bottom, &self.left],
            [
                "padding",
                "padding-top",
                "padding-right",
                "padding-bottom",
                "padding-left",
            ],
        )
    }

    /// Padding for an MJML content tag. A `padding` declaration is always
    /// present so the renderer's own default never applies; side values
    /// override it.
    pub fn outer_declarations(&self) -> Vec<Declaration> {
        let mut out = self.declarations();
        if !out.iter().any(|(name, _)| *name == "padding") {
            out.insert(0, ("padding", "0px".to_string()));
        }
        out
    }
}

impl Margin {
    /// Always yields at least one declaration: `margin:0` when nothing is set
    pub fn declarations(&self) -> Vec<Declaration> {
        let mut out = resolve_sides(
            self.control,
            &self.all,
            [&self.top, &self.right, &self.bottom, &self.left],
            [
                "margin",
                "margin-top",
                "margin-right",
                "margin-bottom",
                "margin-left",
            ],
        );
        if out.is_empty() {
            out.push(("margin", "0".to_string()));
        }
        out
    }
}

fn border_value(
    style: &Option<String>,
    width: &Option<String>,
    color: &Option<String>,
) -> Option<String> {
    let style = non_zero(style).filter(|s| *s != "none")?;
    let width = non_zero(width)?;
    match color.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(color) => Some(format!("{} {} {}", width, style, color)),
        None => Some(format!("{} {}", width, style)),
    }
}

impl Border {
    pub fn declarations(&self) -> Vec<Declaration> {
        let mut out = Vec::new();
        match self.control {
            ControlMode::Separate => {
                let sides = [
                    ("border-top", &self.border_top_style, &self.border_top_width, &self.border_top_color),
                    ("border-right", &self.border_right_style, &self.border_right_width, &self.border_right_color),
                    ("border-bottom", &self.border_bottom_style, &self.border_bottom_width, &self.border_bottom_color),
                    ("border-left", &self.border_left_style, &self.border_left_width, &self.border_left_color),
                ];
                for (name, style, width, color) in sides {
                    if let Some(v) = border_value(style, width, color) {
                        out.push((name, v));
                    }
                }
            }
            ControlMode::All | ControlMode::Unset => {
                if let Some(v) = border_value(&self.border_style, &self.border_width, &self.border_color) {
                    out.push(("border", v));
                }
            }
        }
        out
    }

    pub fn radius(&self) -> Option<Declaration> {
        non_zero(&self.border_radius).map(|r| ("border-radius", r.to_string()))
    }
}

impl TextStyle {
    /// Typography declarations, skipping blank, zero, `none` and `normal` values
    pub fn typography_declarations(&self) -> Vec<Declaration> {
        let fields: [(&'static str, &Option<String>); 9] = [
            ("color", &self.color),
            ("font-family", &self.font_family),
            ("font-size", &self.font_size),
            ("font-style", &self.font_style),
            ("font-weight", &self.font_weight),
            ("line-height", &self.line_height),
            ("letter-spacing", &self.letter_spacing),
            ("text-decoration", &self.text_decoration),
            ("text-transform", &self.text_transform),
        ];
        fields
            .into_iter()
            .filter_map(|(name, value)| renderable(value).map(|v| (name, v.to_string())))
            .collect()
    }

    /// Inline style for a paragraph or heading element
    pub fn line_declarations(&self) -> Vec<Declaration> {
        let mut out = self.typography_declarations();
        out.extend(self.padding.declarations());
        out.extend(self.margin.declarations());
        out
    }
}

/// Render declarations as an inline CSS string (`a:b;c:d`)
pub fn to_css(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{}:{}", name, value))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(decls: &[Declaration]) -> Vec<&'static str> {
        decls.iter().map(|(n, _)| *n).collect()
    }

    #[test]
    fn test_is_zero_length() {
        assert!(is_zero_length("0"));
        assert!(is_zero_length("0px"));
        assert!(is_zero_length(" 0.0em "));
        assert!(is_zero_length("0%"));
        assert!(!is_zero_length("10px"));
        assert!(!is_zero_length("0.5px"));
        assert!(!is_zero_length("auto"));
        assert!(!is_zero_length(""));
    }

    #[test]
    fn test_control_mode_from_wire() {
        let p: Padding = serde_json::from_value(json!({ "paddingControl": "separate" })).unwrap();
        assert_eq!(p.control, ControlMode::Separate);
        let p: Padding = serde_json::from_value(json!({ "paddingControl": "diagonal" })).unwrap();
        assert_eq!(p.control, ControlMode::Unset);
        let p: Padding = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.control, ControlMode::Unset);
    }

    #[test]
    fn test_padding_separate_with_zero_sides_is_empty() {
        let p = Padding {
            control: ControlMode::Separate,
            all: Some("20px".to_string()),
            top: Some("0px".to_string()),
            right: Some("0".to_string()),
            bottom: None,
            left: Some("".to_string()),
        };
        assert!(p.declarations().is_empty());
    }

    #[test]
    fn test_padding_all_emits_single_shorthand() {
        let p = Padding {
            control: ControlMode::All,
            all: Some("12px".to_string()),
            top: Some("4px".to_string()),
            ..Padding::default()
        };
        assert_eq!(p.declarations(), vec![("padding", "12px".to_string())]);
    }

    #[test]
    fn test_padding_separate_emits_present_sides_only() {
        let p = Padding {
            control: ControlMode::Separate,
            top: Some("4px".to_string()),
            left: Some("8px".to_string()),
            ..Padding::default()
        };
        assert_eq!(
            p.declarations(),
            vec![("padding-top", "4px".to_string()), ("padding-left", "8px".to_string())]
        );
    }

    #[test]
    fn test_padding_unset_falls_back_to_shorthand() {
        let p = Padding {
            all: Some("6px".to_string()),
            bottom: Some("9px".to_string()),
            ..Padding::default()
        };
        assert_eq!(p.declarations(), vec![("padding", "6px".to_string())]);
    }

    #[test]
    fn test_outer_padding_is_forced_to_zero() {
        assert_eq!(Padding::default().outer_declarations(), vec![("padding", "0px".to_string())]);
        let p = Padding {
            control: ControlMode::Separate,
            top: Some("10px".to_string()),
            ..Padding::default()
        };
        assert_eq!(names(&p.outer_declarations()), vec!["padding", "padding-top"]);
    }

    #[test]
    fn test_margin_always_has_one_declaration() {
        assert_eq!(Margin::default().declarations(), vec![("margin", "0".to_string())]);
        let separate_empty = Margin {
            control: ControlMode::Separate,
            all: Some("10px".to_string()),
            ..Margin::default()
        };
        assert_eq!(separate_empty.declarations(), vec![("margin", "0".to_string())]);
        let zero = Margin {
            all: Some("0px".to_string()),
            ..Margin::default()
        };
        assert_eq!(zero.declarations().len(), 1);
        let set = Margin {
            control: ControlMode::All,
            all: Some("0 0 16px".to_string()),
            ..Margin::default()
        };
        assert_eq!(set.declarations(), vec![("margin", "0 0 16px".to_string())]);
    }

    #[test]
    fn test_border_suppressed_for_none_or_zero_width() {
        let none_style = Border {
            control: ControlMode::All,
            border_style: Some("none".to_string()),
            border_width: Some("2px".to_string()),
            border_color: Some("#000".to_string()),
            ..Border::default()
        };
        assert!(none_style.declarations().is_empty());

        let zero_width = Border {
            border_style: Some("solid".to_string()),
            border_width: Some("0px".to_string()),
            ..Border::default()
        };
        assert!(zero_width.declarations().is_empty());

        let separate = Border {
            control: ControlMode::Separate,
            border_top_style: Some("none".to_string()),
            border_top_width: Some("1px".to_string()),
            border_left_style: Some("dashed".to_string()),
            border_left_width: Some("0".to_string()),
            border_bottom_style: Some("solid".to_string()),
            border_bottom_width: Some("3px".to_string()),
            border_bottom_color: Some("#ccc".to_string()),
            ..Border::default()
        };
        assert_eq!(
            separate.declarations(),
            vec![("border-bottom", "3px solid #ccc".to_string())]
        );
    }

    #[test]
    fn test_border_radius_ignores_control() {
        let b = Border {
            control: ControlMode::Separate,
            border_radius: Some("4px".to_string()),
            ..Border::default()
        };
        assert_eq!(b.radius(), Some(("border-radius", "4px".to_string())));
        let zero = Border {
            border_radius: Some("0px".to_string()),
            ..Border::default()
        };
        assert_eq!(zero.radius(), None);
    }

    #[test]
    fn test_line_declarations_skip_sentinels() {
        let style: TextStyle = serde_json::from_value(json!({
            "color": "#111111",
            "fontWeight": "normal",
            "letterSpacing": "0px",
            "textDecoration": "none",
            "textTransform": "uppercase",
            "lineHeight": ""
        }))
        .unwrap();
        assert_eq!(
            to_css(&style.line_declarations()),
            "color:#111111;text-transform:uppercase;margin:0"
        );
    }

    #[test]
    fn test_normal_keywords_are_dropped() {
        let style: TextStyle = serde_json::from_value(json!({
            "fontStyle": "normal",
            "fontWeight": "normal",
            "lineHeight": "normal",
            "letterSpacing": "normal",
            "textTransform": "normal"
        }))
        .unwrap();
        assert_eq!(to_css(&style.line_declarations()), "margin:0");
    }

    #[test]
    fn test_root_styles_from_json() {
        let styles: RootStyles = serde_json::from_value(json!({
            "body": { "width": "600px", "backgroundColor": "#f0f0f0" },
            "h1": { "fontSize": "32px", "marginControl": "all", "margin": "0 0 12px" }
        }))
        .unwrap();
        assert_eq!(styles.body.width.as_deref(), Some("600px"));
        assert_eq!(styles.for_line(LineType::H1).font_size.as_deref(), Some("32px"));
        assert_eq!(styles.for_line(LineType::H1).margin.all.as_deref(), Some("0 0 12px"));
        assert_eq!(styles.for_line(LineType::Paragraph), &TextStyle::default());
    }
}
