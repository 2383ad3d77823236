//! Chrome DevTools Protocol screenshot driver

use crate::{png_dimensions, Capture, CaptureConfig, Error, Result};
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, warn};
use std::io::Write;
use std::time::Duration;

/// Resolves once webfonts are ready and every image has loaded or failed.
const IDLE_SCRIPT: &str = r#"(async function() {
    await document.fonts.ready;
    await Promise.all(Array.from(document.images).map(function(img) {
        if (img.complete) return true;
        return new Promise(function(resolve) {
            img.addEventListener('load', function() { resolve(true); });
            img.addEventListener('error', function() { resolve(false); });
        });
    }));
    return true;
})()"#;

/// Captures HTML with a fresh headless Chrome per call.
///
/// Nothing is pooled: every capture pays browser start-up, and a capture that
/// crashes or wedges its browser cannot affect the next one.
#[derive(Debug, Clone, Default)]
pub struct ChromeCapturer {
    config: CaptureConfig,
}

impl ChromeCapturer {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    fn launch(&self, width: u32, height: u32) -> Result<Browser> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(self.config.sandbox)
            .window_size(Some((width, height)))
            .path(self.config.chrome_path.clone())
            .idle_browser_timeout(Duration::from_millis(self.config.idle_timeout_ms))
            .build()
            .map_err(|e| Error::LaunchError(format!("Failed to build launch options: {}", e)))?;

        Browser::new(launch_options)
            .map_err(|e| Error::LaunchError(format!("Failed to launch browser: {}", e)))
    }
}

impl Capture for ChromeCapturer {
    fn capture(&self, html: &str, width: u32, height: u32) -> Result<Vec<u8>> {
        // Served from disk so `file://` images load same-origin.
        let mut page = tempfile::Builder::new()
            .prefix("thumbgen-")
            .suffix(".html")
            .tempfile()?;
        page.write_all(html.as_bytes())?;
        page.flush()?;
        let url = crate::rendering::file_url(page.path());

        // `browser` and `page` drop on every return path below, which kills
        // the Chrome process and removes the scratch file.
        let browser = self.launch(width, height)?;
        let tab = browser
            .new_tab()
            .map_err(|e| Error::LaunchError(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(Duration::from_millis(self.config.idle_timeout_ms));

        debug!("capturing {}x{} from {}", width, height, url);
        tab.navigate_to(&url)
            .map_err(|e| Error::CaptureError(format!("Navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| Error::CaptureError(format!("Wait for navigation failed: {}", e)))?;
        tab.evaluate(IDLE_SCRIPT, true)
            .map_err(|e| Error::CaptureError(format!("Wait for fonts and images failed: {}", e)))?;

        if self.config.settle_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.config.settle_ms));
        }

        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: width as f64,
            height: height as f64,
            scale: 1.0,
        };
        let png = tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
            .map_err(|e| Error::CaptureError(format!("Screenshot failed: {}", e)))?;

        match png_dimensions(&png) {
            Some((w, h)) if (w, h) != (width, height) => {
                warn!("captured {}x{} but {}x{} was requested", w, h, width, height);
            }
            Some(_) => {}
            None => return Err(Error::CaptureError("browser returned a non-PNG screenshot".into())),
        }

        Ok(png)
    }
}
