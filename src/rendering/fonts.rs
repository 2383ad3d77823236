//! Font sources for rendered documents.
//!
//! Web stylesheets need network access at capture time. Local faces are read
//! once and embedded into the document as `data:` URLs, so a render that only
//! uses local faces does not depend on the network at all.

use crate::Result;
use base64::Engine as Base64Engine;
use std::path::Path;

/// Inter from Google Fonts, the family templates default to.
pub const INTER_STYLESHEET: &str =
    "https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700;800;900&display=swap";

/// A font file embedded into the document as an `@font-face` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    pub family: String,
    /// CSS `font-weight` descriptor; `None` leaves it to the browser.
    pub weight: Option<String>,
    data_url: String,
    format: &'static str,
}

impl FontFace {
    /// Read `path` and embed it under `family`.
    pub fn from_file(family: impl Into<String>, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let (mime, format) = font_kind(path);
        let data_url = format!(
            "data:{};base64,{}",
            mime,
            base64::engine::general_purpose::STANDARD.encode(bytes)
        );
        Ok(Self {
            family: family.into(),
            weight: None,
            data_url,
            format,
        })
    }

    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    /// Parse a `FAMILY=PATH` command line argument.
    pub fn from_arg(arg: &str) -> Result<Self> {
        let (family, path) = arg.split_once('=').ok_or_else(|| {
            crate::Error::Other(format!("font argument '{}' is not FAMILY=PATH", arg))
        })?;
        Self::from_file(family.trim(), Path::new(path.trim()))
    }

    pub fn css_rule(&self) -> String {
        let mut rule = format!(
            "@font-face {{ font-family: '{}'; src: url({}) format('{}');",
            self.family, self.data_url, self.format
        );
        if let Some(weight) = &self.weight {
            rule.push_str(&format!(" font-weight: {};", weight));
        }
        rule.push_str(" }");
        rule
    }
}

/// MIME type for the data URL and the matching `format()` hint.
fn font_kind(path: &Path) -> (&'static str, &'static str) {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("otf") => ("font/otf", "opentype"),
        Some("woff") => ("font/woff", "woff"),
        Some("woff2") => ("font/woff2", "woff2"),
        _ => ("font/ttf", "truetype"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_file_as_data_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Brand.woff2");
        std::fs::write(&path, b"abc").unwrap();

        let face = FontFace::from_arg(&format!("Brand={}", path.display()))
            .unwrap()
            .with_weight("800");
        let rule = face.css_rule();
        assert!(rule.contains("font-family: 'Brand'"));
        assert!(rule.contains("data:font/woff2;base64,YWJj) format('woff2');"));
        assert!(rule.contains("font-weight: 800;"));
    }

    #[test]
    fn format_hint_follows_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        for (file, hint) in [("a.ttf", "truetype"), ("b.OTF", "opentype"), ("c.woff", "woff")] {
            let path = dir.path().join(file);
            std::fs::write(&path, b"x").unwrap();
            let rule = FontFace::from_file("F", &path).unwrap().css_rule();
            assert!(rule.contains(&format!("format('{}')", hint)), "{}", rule);
        }
    }

    #[test]
    fn bad_font_argument_is_an_error() {
        assert!(FontFace::from_arg("no-equals-sign").is_err());
        assert!(FontFace::from_arg("X=/no/such/font.ttf").is_err());
    }
}
