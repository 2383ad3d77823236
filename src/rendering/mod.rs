//! Template to HTML rendering
//!
//! The browser does all layout and painting; this module only writes a
//! document in which every element is an absolutely positioned `div`. DOM
//! order is paint order, so no `z-index` is ever emitted.

pub mod fonts;
pub mod style;

pub use fonts::{FontFace, INTER_STYLESHEET};

use crate::assets::AssetResolver;
use crate::template::{Canvas, Element, ImageElement, Template};
use log::{debug, warn};

/// Document-level options: which fonts the page pulls in.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Stylesheet URLs linked from the document head.
    pub stylesheets: Vec<String>,
    /// Font files embedded into the document.
    pub fonts: Vec<FontFace>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            stylesheets: vec![INTER_STYLESHEET.to_string()],
            fonts: Vec::new(),
        }
    }
}

impl RenderOptions {
    /// No web stylesheets; only embedded faces and system fonts.
    pub fn offline() -> Self {
        Self {
            stylesheets: Vec::new(),
            fonts: Vec::new(),
        }
    }

    pub fn with_font(mut self, font: FontFace) -> Self {
        self.fonts.push(font);
        self
    }
}

/// Turns templates into standalone HTML documents.
#[derive(Debug, Clone)]
pub struct Renderer {
    resolver: AssetResolver,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(resolver: AssetResolver) -> Self {
        Self {
            resolver,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolver(&self) -> &AssetResolver {
        &self.resolver
    }

    pub fn render_template(&self, template: &Template) -> String {
        self.render(&template.canvas, &template.elements)
    }

    /// Render `elements` over `canvas`, in input order.
    ///
    /// Images whose asset cannot be found are skipped with a warning and
    /// unknown element kinds are skipped silently; neither fails the render.
    pub fn render(&self, canvas: &Canvas, elements: &[Element]) -> String {
        let mut html = self.head(canvas);

        for (index, element) in elements.iter().enumerate() {
            match element {
                Element::Text(text) => {
                    html.push_str(&format!(
                        "        <div class=\"element element-text\" style=\"{}\">{}</div>\n",
                        style::text_style(text),
                        text.content
                    ));
                }
                Element::Image(image) => match self.image_src(image) {
                    Some(src) => {
                        html.push_str(&format!(
                            "        <div class=\"element element-image\" style=\"{}\"><img src=\"{}\"></div>\n",
                            style::frame_style(&image.frame),
                            src
                        ));
                    }
                    None => {
                        warn!(
                            "Asset not found: {}",
                            image.reference().unwrap_or("<no src>")
                        );
                    }
                },
                Element::Shape(shape) => {
                    html.push_str(&format!(
                        "        <div class=\"element element-shape\" style=\"{}\"></div>\n",
                        style::shape_style(shape)
                    ));
                }
                Element::Unknown => {
                    debug!("skipping element {} of unknown type", index);
                }
            }
        }

        html.push_str("    </div>\n</body>\n</html>");
        html
    }

    fn head(&self, canvas: &Canvas) -> String {
        let mut links = String::new();
        for href in &self.options.stylesheets {
            links.push_str(&format!(
                "    <link href=\"{}\" rel=\"stylesheet\">\n",
                href
            ));
        }

        let mut faces = String::new();
        for face in &self.options.fonts {
            faces.push_str(&format!("        {}\n", face.css_rule()));
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
{links}    <style>
{faces}        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            width: {width}px;
            height: {height}px;
            overflow: hidden;
            font-family: 'Inter', sans-serif;
        }}
        .canvas {{
            width: 100%;
            height: 100%;
            background: {background};
            position: relative;
        }}
        .element {{
            position: absolute;
        }}
        .element-text {{
            white-space: pre-wrap;
            word-break: break-word;
        }}
        .element-image img {{
            width: 100%;
            height: 100%;
            object-fit: contain;
        }}
    </style>
</head>
<body>
    <div class="canvas">
"#,
            links = links,
            faces = faces,
            width = canvas.width,
            height = canvas.height,
            background = canvas.background,
        )
    }

    /// Pick the `src` for an image element, or `None` to skip it.
    fn image_src(&self, image: &ImageElement) -> Option<String> {
        let reference = match image.reference() {
            Some(r) => r,
            None => return None,
        };

        if reference.starts_with("data:") || reference.starts_with("file://") {
            return Some(reference.to_string());
        }

        let name = reference.strip_prefix("/assets/").unwrap_or(reference);
        if let Some(path) = self.resolver.resolve(name) {
            return Some(file_url(&path));
        }

        image.inline_data().map(str::to_string)
    }
}

/// `file://` URL for an absolute path, percent-encoded where needed.
pub fn file_url(path: &std::path::Path) -> String {
    url::Url::from_file_path(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("file://{}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{CssValue, Frame, ShapeElement, TextElement};

    fn renderer() -> Renderer {
        Renderer::new(AssetResolver::new("/nonexistent-assets")).with_options(RenderOptions::offline())
    }

    #[test]
    fn body_uses_canvas_dimensions_and_background() {
        let html = renderer().render(&Canvas::new(1280, 720, "linear-gradient(#000, #fff)"), &[]);
        assert!(html.contains("width: 1280px;"));
        assert!(html.contains("height: 720px;"));
        assert!(html.contains("background: linear-gradient(#000, #fff);"));
        assert!(!html.contains("<link"));
    }

    #[test]
    fn default_options_link_inter() {
        let r = Renderer::new(AssetResolver::new("/nonexistent-assets"));
        let html = r.render(&Canvas::new(10, 10, "#000"), &[]);
        assert!(html.contains(INTER_STYLESHEET));
    }

    #[test]
    fn text_content_is_verbatim() {
        let text = Element::Text(TextElement {
            frame: Frame::new(0.0, 0.0, 10.0, 10.0),
            content: "<b>Rust</b> &amp; more".into(),
            font_size: 64.0,
            font_weight: CssValue::Number(900.0),
            color: "red".into(),
            font_family: "Inter".into(),
        });
        let html = renderer().render(&Canvas::new(10, 10, "#000"), &[text]);
        assert!(!html.contains("&lt;b&gt;"));
        assert!(html.contains("<b>Rust</b> &amp; more</div>"));
        assert!(html.contains("font-size: 64px; font-weight: 900; color: red; font-family: Inter;"));
    }

    #[test]
    fn unresolved_image_is_skipped_but_data_src_kept() {
        let missing = Element::Image(ImageElement {
            frame: Frame::new(0.0, 0.0, 10.0, 10.0),
            src: None,
            asset_path: Some("ghost".into()),
        });
        let inline = Element::Image(ImageElement {
            frame: Frame::new(0.0, 0.0, 10.0, 10.0),
            src: Some("data:image/png;base64,AAAA".into()),
            asset_path: Some("ghost".into()),
        });
        let html = renderer().render(&Canvas::new(10, 10, "#000"), &[missing, inline]);
        assert_eq!(html.matches("element-image").count(), 2); // one CSS rule + one div
        assert!(html.contains("<img src=\"data:image/png;base64,AAAA\">"));
    }

    #[test]
    fn unknown_elements_emit_nothing() {
        let shape = Element::Shape(ShapeElement {
            frame: Frame::new(0.0, 0.0, 10.0, 10.0),
            color: "#fff".into(),
            border_radius: CssValue::Number(0.0),
        });
        let html = renderer().render(
            &Canvas::new(10, 10, "#000"),
            &[Element::Unknown, shape, Element::Unknown],
        );
        assert_eq!(html.matches("<div class=\"element ").count(), 1);
    }
}
