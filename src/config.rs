//! Thumbnail config files (YAML or JSON) and the built-in layout they drive.
//!
//! ```yaml
//! output: { width: 1280, height: 720, filename: intro.png }
//! grid: { rows: 2, cols: 3 }
//! style: { background_color: "#1a1a2e", accent_color: "#4ecca3" }
//! title: Borrowing in Rust
//! concepts: [ferris, cargo, crates]
//! ```
//!
//! Missing sections and fields fall back to defaults. Fields of the wrong
//! type fail the load.

use crate::template::{Canvas, CssValue, Element, Frame, ImageElement, ShapeElement, TextElement};
use crate::{Error, Result, Template};
use log::warn;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            filename: "thumbnail.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { rows: 2, cols: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub background_color: String,
    pub title_color: String,
    pub subtitle_color: String,
    pub accent_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: "#1a1a2e".to_string(),
            title_color: "#ffffff".to_string(),
            subtitle_color: "#a0a0b0".to_string(),
            accent_color: "#4ecca3".to_string(),
        }
    }
}

/// Everything one config-driven thumbnail needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub output: OutputConfig,
    pub grid: GridConfig,
    pub style: StyleConfig,
    pub title: String,
    pub subtitle: String,
    pub difficulty: Option<String>,
    pub author_name: Option<String>,
    pub avatar: Option<String>,
    pub brand_logo: Option<String>,
    pub tech_logo: Option<String>,
    pub concepts: Vec<String>,
    pub show_large_avatar: bool,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            grid: GridConfig::default(),
            style: StyleConfig::default(),
            title: "Untitled".to_string(),
            subtitle: String::new(),
            difficulty: None,
            author_name: None,
            avatar: None,
            brand_logo: None,
            tech_logo: None,
            concepts: Vec::new(),
            show_large_avatar: false,
        }
    }
}

impl ThumbnailConfig {
    /// Load a config file. `.json` files are read as JSON, everything else
    /// as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let parsed = if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        };
        parsed.map_err(|e| match e {
            Error::ConfigError(msg) => Error::ConfigError(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty document is a config with every default.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| Error::ConfigError(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Lay the config out as a template.
    ///
    /// Title block on the left, concept icons in a `rows x cols` grid on the
    /// right, logos in the top corners and the avatar bottom right. Asset
    /// names are left for the renderer to resolve.
    pub fn to_template(&self) -> Template {
        let w = self.output.width as f64;
        let h = self.output.height as f64;
        let margin = (w.min(h) * 0.05).round();
        let left_width = w * 0.5 - margin * 1.5;
        let mut elements = Vec::new();

        let logo = (h * 0.1).round();
        if let Some(brand) = &self.brand_logo {
            elements.push(image(brand, Frame::new(margin, margin, logo, logo)));
        }
        if let Some(tech) = &self.tech_logo {
            elements.push(image(tech, Frame::new(w - margin - logo, margin, logo, logo)));
        }

        let title_size = (h * 0.1).round();
        let title_top = margin * 2.0 + logo;
        let title_height = title_size * 3.5;
        elements.push(text(
            &self.title,
            Frame::new(margin, title_top, left_width, title_height),
            title_size,
            CssValue::Number(900.0),
            &self.style.title_color,
        ));

        let mut cursor = title_top + title_height + margin * 0.5;
        if !self.subtitle.is_empty() {
            let size = (title_size * 0.45).round();
            elements.push(text(
                &self.subtitle,
                Frame::new(margin, cursor, left_width, size * 2.6),
                size,
                CssValue::Number(600.0),
                &self.style.subtitle_color,
            ));
            cursor += size * 2.6 + margin * 0.5;
        }

        if let Some(difficulty) = &self.difficulty {
            let size = (title_size * 0.35).round();
            let badge = Frame::new(margin, cursor, size * 7.0, size * 2.0);
            elements.push(Element::Shape(ShapeElement {
                frame: badge,
                color: self.style.accent_color.clone(),
                border_radius: CssValue::Number(badge.height / 2.0),
            }));
            elements.push(text(
                difficulty,
                Frame::new(badge.x + size * 0.8, badge.y + size * 0.45, badge.width - size * 1.6, size * 1.3),
                size,
                CssValue::Number(800.0),
                &self.style.background_color,
            ));
        }

        if let Some(author) = &self.author_name {
            let size = (title_size * 0.3).round();
            elements.push(text(
                author,
                Frame::new(margin, h - margin - size * 1.4, left_width, size * 1.4),
                size,
                CssValue::Number(600.0),
                &self.style.subtitle_color,
            ));
        }

        elements.extend(self.concept_grid(w, h, margin, logo));

        if let Some(avatar) = &self.avatar {
            let size = if self.show_large_avatar { (h * 0.45).round() } else { (h * 0.2).round() };
            elements.push(image(avatar, Frame::new(w - margin - size, h - margin - size, size, size)));
        }

        Template::new(
            Canvas::new(self.output.width, self.output.height, self.style.background_color.clone()),
            elements,
        )
    }

    fn concept_grid(&self, w: f64, h: f64, margin: f64, logo: f64) -> Vec<Element> {
        let rows = self.grid.rows.max(1) as usize;
        let cols = self.grid.cols.max(1) as usize;
        let capacity = rows * cols;
        if self.concepts.len() > capacity {
            warn!(
                "{} concepts given but the {}x{} grid holds {}; dropping the rest",
                self.concepts.len(),
                rows,
                cols,
                capacity
            );
        }

        let area = Frame::new(w * 0.5 + margin * 0.5, margin * 2.0 + logo, w * 0.5 - margin * 1.5, h * 0.5);
        let cell_w = area.width / cols as f64;
        let cell_h = area.height / rows as f64;
        let icon = (cell_w.min(cell_h) * 0.8).floor().max(1.0);

        self.concepts
            .iter()
            .take(capacity)
            .enumerate()
            .map(|(i, name)| {
                let (row, col) = (i / cols, i % cols);
                let x = area.x + col as f64 * cell_w + (cell_w - icon) / 2.0;
                let y = area.y + row as f64 * cell_h + (cell_h - icon) / 2.0;
                image(name, Frame::new(x.floor(), y.floor(), icon, icon))
            })
            .collect()
    }
}

fn image(asset: &str, frame: Frame) -> Element {
    Element::Image(ImageElement {
        frame,
        src: None,
        asset_path: Some(asset.to_string()),
    })
}

fn text(content: &str, frame: Frame, size: f64, weight: CssValue, color: &str) -> Element {
    Element::Text(TextElement {
        frame,
        content: content.to_string(),
        font_size: size,
        font_weight: weight,
        color: color.to_string(),
        font_family: crate::template::DEFAULT_FONT_FAMILY.to_string(),
    })
}
