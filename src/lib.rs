//! thumbgen
//!
//! Renders declarative thumbnail templates (a canvas plus positioned text,
//! image and shape elements) to PNG. Templates become a plain HTML document
//! which a headless browser lays out and screenshots.
//!
//! # Features
//!
//! - **CDP Backend** (default): captures through headless Chrome
//! - **Asset lookup**: images referenced by bare name, path or inline data
//! - **Editor server**: a local HTTP server backing the template editor
//!
//! # Example
//!
//! ```no_run
//! use thumbgen::{AssetResolver, Renderer, Template};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let template = Template::from_json(
//!     r##"{"canvas":{"width":1280,"height":720,"background":"#000"},"elements":[]}"##,
//! )?;
//! let renderer = Renderer::new(AssetResolver::new("assets"));
//! let capturer = thumbgen::default_capturer(Default::default())?;
//! let png = thumbgen::generate(&template, &renderer, capturer.as_ref())?;
//! std::fs::write("out.png", png)?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

pub mod error;
pub use error::{Error, Result};

pub mod assets;
pub mod config;
pub mod paths;
pub mod rendering;
pub mod server;
pub mod template;

#[cfg(feature = "cdp")]
pub mod cdp;

pub use assets::AssetResolver;
pub use config::ThumbnailConfig;
pub use paths::Paths;
pub use rendering::{FontFace, RenderOptions, Renderer};
pub use template::{Canvas, Element, Template};

/// Configuration for the screenshot driver
///
/// The defaults leave the browser plenty of time for webfonts and keep
/// Chrome's sandbox on.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Upper bound for navigation and the font/image idle wait, in milliseconds
    pub idle_timeout_ms: u64,
    /// Extra wait after the page reports idle, in milliseconds
    pub settle_ms: u64,
    /// Chrome binary to launch; `None` lets the driver search for one
    pub chrome_path: Option<PathBuf>,
    /// Whether to keep Chrome's sandbox enabled
    pub sandbox: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 30000,
            settle_ms: 250,
            chrome_path: None,
            sandbox: true,
        }
    }
}

/// Turns an HTML document into a PNG of exactly `width` x `height` pixels.
///
/// Implementations must not leave partial output behind on failure.
pub trait Capture: Send {
    fn capture(&self, html: &str, width: u32, height: u32) -> Result<Vec<u8>>;
}

/// Create the default capture backend.
#[cfg(feature = "cdp")]
pub fn default_capturer(config: CaptureConfig) -> Result<Box<dyn Capture>> {
    Ok(Box::new(cdp::ChromeCapturer::new(config)))
}

#[cfg(not(feature = "cdp"))]
pub fn default_capturer(_config: CaptureConfig) -> Result<Box<dyn Capture>> {
    Err(Error::LaunchError(
        "thumbgen was built without the `cdp` feature; no browser backend is available".into(),
    ))
}

/// Render `template` and capture it at canvas size.
pub fn generate(template: &Template, renderer: &Renderer, capturer: &dyn Capture) -> Result<Vec<u8>> {
    let html = renderer.render_template(template);
    capturer.capture(&html, template.canvas.width, template.canvas.height)
}

/// [`generate`], then write the PNG to `output`. Nothing is written unless the
/// capture succeeded.
pub fn generate_to_file(
    template: &Template,
    renderer: &Renderer,
    capturer: &dyn Capture,
    output: &Path,
) -> Result<PathBuf> {
    let png = generate(template, renderer, capturer)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, png)?;
    Ok(output.to_path_buf())
}

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Width and height from a PNG's IHDR chunk, or `None` if `data` is not a PNG.
pub fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 24 || &data[0..8] != PNG_SIGNATURE || &data[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Some((width, height))
}
