//! Template data model: a canvas plus an ordered list of elements.
//!
//! Templates arrive as JSON, either from a file under `templates/` or from the
//! editor's export request:
//!
//! ```json
//! { "canvas": { "width": 1280, "height": 720, "background": "#000" },
//!   "elements": [ { "type": "shape", "x": 0, "y": 0, "width": 100, "height": 100 } ] }
//! ```
//!
//! Parsing is validated up front so a broken template fails with a message
//! naming the offending field instead of a raw type error halfway through a
//! render.

use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;

pub const DEFAULT_BACKGROUND: &str = "#000000";
pub const DEFAULT_FONT_SIZE: f64 = 48.0;
pub const DEFAULT_FONT_WEIGHT: u32 = 700;
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_SHAPE_COLOR: &str = "#4ecca3";

/// The fixed-size frame everything is composed onto.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    /// Any CSS `background` value: a color or a gradient.
    #[serde(default = "default_background")]
    pub background: String,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: impl Into<String>) -> Self {
        Self {
            width,
            height,
            background: background.into(),
        }
    }
}

/// Position and size shared by every element kind, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let all = [self.x, self.y, self.width, self.height];
        if all.iter().any(|v| !v.is_finite()) {
            return Err("geometry must be finite".into());
        }
        if self.x < 0.0 || self.y < 0.0 {
            return Err(format!("position ({}, {}) must be non-negative", self.x, self.y));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(format!("size {}x{} must be positive", self.width, self.height));
        }
        Ok(())
    }
}

/// A CSS value that templates may give either as a number or as a string
/// (`"fontWeight": 800` and `"fontWeight": "bold"` are both accepted).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssValue::Number(n) => write!(f, "{}", n),
            CssValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(flatten)]
    pub frame: Frame,
    /// Inserted into the document as-is. Markup in here is rendered, not
    /// escaped; templates are trusted input.
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_weight")]
    pub font_weight: CssValue,
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    #[serde(flatten)]
    pub frame: Frame,
    /// Inline `data:` URL, `file://` URL, `/assets/...` path or asset name.
    #[serde(default)]
    pub src: Option<String>,
    /// Asset name or path relative to the assets root; wins over `src`.
    #[serde(default)]
    pub asset_path: Option<String>,
}

impl ImageElement {
    /// The reference handed to asset resolution.
    pub fn reference(&self) -> Option<&str> {
        self.asset_path
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.src.as_deref())
    }

    /// `src` when it is an embedded `data:` image.
    pub fn inline_data(&self) -> Option<&str> {
        self.src.as_deref().filter(|s| s.starts_with("data:"))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default = "default_shape_color")]
    pub color: String,
    #[serde(default = "default_border_radius")]
    pub border_radius: CssValue,
}

/// A single positioned visual unit.
///
/// `Unknown` is the catch-all for `type` values this crate does not draw; it
/// parses successfully and renders to nothing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(TextElement),
    Image(ImageElement),
    Shape(ShapeElement),
    #[serde(other)]
    Unknown,
}

impl Element {
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Element::Text(t) => Some(&t.frame),
            Element::Image(i) => Some(&i.frame),
            Element::Shape(s) => Some(&s.frame),
            Element::Unknown => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Element::Text(_) => "text",
            Element::Image(_) => "image",
            Element::Shape(_) => "shape",
            Element::Unknown => "unknown",
        }
    }
}

/// A canvas plus its elements in paint order (later elements on top).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Template {
    pub canvas: Canvas,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Template {
    pub fn new(canvas: Canvas, elements: Vec<Element>) -> Self {
        Self { canvas, elements }
    }

    /// Parse and validate a template from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse and validate an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let canvas = value
            .get("canvas")
            .ok_or_else(|| Error::TemplateError("missing required field `canvas`".into()))?;
        for field in ["width", "height"] {
            if canvas.get(field).is_none() {
                return Err(Error::TemplateError(format!(
                    "missing required field `canvas.{}`",
                    field
                )));
            }
        }

        let template: Template = serde_json::from_value(value)?;
        template.validate()?;
        Ok(template)
    }

    /// Read and parse a template file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
            .map_err(|e| Error::TemplateError(format!("{}: {}", path.display(), strip_prefix(e))))
    }

    /// Check the canvas and element geometry invariants.
    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(Error::TemplateError(format!(
                "canvas size {}x{} must be positive",
                self.canvas.width, self.canvas.height
            )));
        }
        for (index, element) in self.elements.iter().enumerate() {
            if let Some(frame) = element.frame() {
                frame.validate().map_err(|msg| {
                    Error::TemplateError(format!("element {} ({}): {}", index, element.kind(), msg))
                })?;
            }
        }
        Ok(())
    }
}

fn strip_prefix(err: Error) -> String {
    match err {
        Error::TemplateError(msg) => msg,
        other => other.to_string(),
    }
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_weight() -> CssValue {
    CssValue::Number(DEFAULT_FONT_WEIGHT as f64)
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_shape_color() -> String {
    DEFAULT_SHAPE_COLOR.to_string()
}

fn default_border_radius() -> CssValue {
    CssValue::Number(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_element_kinds_with_defaults() {
        let t = Template::from_json(
            r#"{"canvas":{"width":1280,"height":720},"elements":[
                {"type":"text","x":10,"y":20,"width":300,"height":80,"content":"Hi"},
                {"type":"image","x":0,"y":0,"width":50,"height":50,"assetPath":"logo"},
                {"type":"shape","x":0,"y":0,"width":100,"height":100}
            ]}"#,
        )
        .unwrap();

        assert_eq!(t.canvas.background, DEFAULT_BACKGROUND);
        match &t.elements[0] {
            Element::Text(text) => {
                assert_eq!(text.font_size, 48.0);
                assert_eq!(text.font_weight.to_string(), "700");
                assert_eq!(text.color, "#ffffff");
                assert_eq!(text.font_family, "Inter");
            }
            other => panic!("expected text, got {:?}", other),
        }
        match &t.elements[1] {
            Element::Image(img) => assert_eq!(img.reference(), Some("logo")),
            other => panic!("expected image, got {:?}", other),
        }
        match &t.elements[2] {
            Element::Shape(shape) => {
                assert_eq!(shape.color, "#4ecca3");
                assert_eq!(shape.border_radius, CssValue::Number(0.0));
            }
            other => panic!("expected shape, got {:?}", other),
        }
    }

    #[test]
    fn unknown_type_is_kept_as_catch_all() {
        let t = Template::from_json(
            r#"{"canvas":{"width":10,"height":10},"elements":[{"type":"video","src":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(t.elements, vec![Element::Unknown]);
    }

    #[test]
    fn missing_canvas_dimension_is_named() {
        let err = Template::from_json(r#"{"canvas":{"width":10}}"#).unwrap_err();
        assert!(err.to_string().contains("canvas.height"), "{}", err);

        let err = Template::from_json(r#"{"elements":[]}"#).unwrap_err();
        assert!(err.to_string().contains("`canvas`"), "{}", err);
    }

    #[test]
    fn zero_canvas_is_rejected() {
        let err = Template::from_json(r#"{"canvas":{"width":0,"height":10}}"#).unwrap_err();
        assert!(matches!(err, Error::TemplateError(_)));
    }

    #[test]
    fn negative_position_is_rejected() {
        let err = Template::from_json(
            r#"{"canvas":{"width":10,"height":10},"elements":[
                {"type":"shape","x":-1,"y":0,"width":5,"height":5}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("element 0 (shape)"), "{}", err);
    }

    #[test]
    fn string_css_values_are_accepted() {
        let t = Template::from_json(
            r#"{"canvas":{"width":10,"height":10},"elements":[
                {"type":"text","x":0,"y":0,"width":5,"height":5,"fontWeight":"bold"},
                {"type":"shape","x":0,"y":0,"width":5,"height":5,"borderRadius":"50%"}]}"#,
        )
        .unwrap();
        match (&t.elements[0], &t.elements[1]) {
            (Element::Text(text), Element::Shape(shape)) => {
                assert_eq!(text.font_weight, CssValue::Text("bold".into()));
                assert_eq!(shape.border_radius, CssValue::Text("50%".into()));
            }
            other => panic!("unexpected elements {:?}", other),
        }
    }

    #[test]
    fn asset_path_wins_over_src() {
        let img = ImageElement {
            frame: Frame::new(0.0, 0.0, 1.0, 1.0),
            src: Some("data:image/png;base64,AAAA".into()),
            asset_path: Some("avatar".into()),
        };
        assert_eq!(img.reference(), Some("avatar"));
        assert_eq!(img.inline_data(), Some("data:image/png;base64,AAAA"));
    }
}
