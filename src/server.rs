//! # Editor HTTP Server
//!
//! Backs the browser-based template editor.
//!
//! ## Routes
//!
//! - `GET /`, `GET /index.html` - the editor page from `editor/`
//! - `GET /assets/<path>` - a file from the assets root
//! - `GET /api/assets` - JSON array of every image asset, sorted
//! - `POST /api/export` - template JSON in, PNG out; any failure is a 500
//!
//! Requests are served strictly one at a time on the calling thread. An
//! export holds the server for the whole browser launch and capture.

use crate::{AssetResolver, Capture, Error, Paths, Renderer, Result, Template};
use log::{debug, info, warn};
use std::io::Read;
use std::net::SocketAddr;
use tiny_http::{Header, Method, Response, Server};

/// A fully-formed HTTP reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Reply {
    fn new(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: content_type.to_string(),
            body,
        }
    }

    fn text(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, "text/plain; charset=utf-8", message.into().into_bytes())
    }

    fn not_found(what: &str) -> Self {
        Self::text(404, format!("{} not found", what))
    }
}

/// Request handling, independent of the socket it arrives on.
pub struct EditorApp {
    paths: Paths,
    renderer: Renderer,
    capturer: Box<dyn Capture>,
}

impl EditorApp {
    pub fn new(paths: Paths, renderer: Renderer, capturer: Box<dyn Capture>) -> Self {
        Self {
            paths,
            renderer,
            capturer,
        }
    }

    /// Build an app whose renderer resolves assets under `paths.assets`.
    pub fn with_defaults(paths: Paths, capturer: Box<dyn Capture>) -> Self {
        let renderer = Renderer::new(AssetResolver::new(&paths.assets));
        Self::new(paths, renderer, capturer)
    }

    fn resolver(&self) -> &AssetResolver {
        self.renderer.resolver()
    }

    /// Route one request. `url` may carry a query string, which is ignored.
    pub fn handle(&self, method: &Method, url: &str, body: &[u8]) -> Reply {
        let path = url.split(['?', '#']).next().unwrap_or(url);

        match (method, path) {
            (Method::Get, "/") | (Method::Get, "/index.html") => self.index(),
            (Method::Get, "/api/assets") => self.list_assets(),
            (Method::Get, p) if p.starts_with("/assets/") => self.asset(&p["/assets/".len()..]),
            (Method::Post, "/api/export") => self.export(body),
            _ => Reply::not_found("Route"),
        }
    }

    fn index(&self) -> Reply {
        match std::fs::read(self.paths.editor.join("index.html")) {
            Ok(page) => Reply::new(200, "text/html; charset=utf-8", page),
            Err(e) => {
                warn!("editor page unavailable: {}", e);
                Reply::not_found("Editor page")
            }
        }
    }

    fn asset(&self, encoded: &str) -> Reply {
        let relative = match percent_decode(encoded) {
            Some(r) => r,
            None => return Reply::not_found("Asset"),
        };
        let path = match self.resolver().file_at(&relative) {
            Some(p) => p,
            None => return Reply::not_found("Asset"),
        };
        match std::fs::read(&path) {
            Ok(data) => {
                let mime = mime_guess::from_path(&path).first_or_octet_stream().to_string();
                Reply::new(200, &mime, data)
            }
            Err(e) => Reply::text(500, e.to_string()),
        }
    }

    fn list_assets(&self) -> Reply {
        match serde_json::to_vec(&self.resolver().list()) {
            Ok(json) => Reply::new(200, "application/json", json),
            Err(e) => Reply::text(500, e.to_string()),
        }
    }

    fn export(&self, body: &[u8]) -> Reply {
        let template = match std::str::from_utf8(body)
            .map_err(|e| Error::TemplateError(e.to_string()))
            .and_then(Template::from_json)
        {
            Ok(t) => t,
            Err(e) => {
                warn!("export rejected: {}", e);
                return Reply::text(500, e.to_string());
            }
        };

        info!(
            "exporting {}x{} template with {} elements",
            template.canvas.width,
            template.canvas.height,
            template.elements.len()
        );

        match crate::generate(&template, &self.renderer, self.capturer.as_ref()) {
            Ok(png) => Reply::new(200, "image/png", png),
            Err(e) => {
                warn!("export failed: {}", e);
                Reply::text(500, e.to_string())
            }
        }
    }
}

/// A bound editor server.
pub struct EditorServer {
    http: Server,
    app: EditorApp,
}

impl EditorServer {
    /// Bind to `addr` (e.g. `127.0.0.1:8080`, or port 0 for any free port).
    pub fn bind(addr: &str, app: EditorApp) -> Result<Self> {
        let http = Server::http(addr)
            .map_err(|e| Error::ServerError(format!("Failed to bind to {}: {}", addr, e)))?;
        Ok(Self { http, app })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// Serve requests until the listener shuts down.
    pub fn run(self) -> Result<()> {
        if let Some(addr) = self.local_addr() {
            info!("Starting thumbnail editor at http://{}", addr);
        }

        for mut request in self.http.incoming_requests() {
            let mut body = Vec::new();
            if let Err(e) = request.as_reader().read_to_end(&mut body) {
                warn!("failed to read request body: {}", e);
                let url = request.url().to_string();
                send(request, Response::from_string("bad request").with_status_code(400), &url);
                continue;
            }

            let method = request.method().clone();
            let url = request.url().to_string();
            let reply = self.app.handle(&method, &url, &body);
            debug!("{} {} -> {}", method, url, reply.status);

            let mut response = Response::from_data(reply.body).with_status_code(reply.status);
            if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
                response = response.with_header(header);
            }
            send(request, response, &url);
        }

        Ok(())
    }
}

fn send<R: Read>(request: tiny_http::Request, response: Response<R>, url: &str) {
    if let Err(e) = request.respond(response) {
        warn!("failed to send response for {}: {}", url, e);
    }
}

/// Decode `%XX` escapes in a URL path. `None` when the result is not UTF-8.
///
/// Dot segments are resolved while parsing and cannot climb above the root.
fn percent_decode(encoded: &str) -> Option<String> {
    let url = url::Url::parse(&format!("file:///{}", encoded)).ok()?;
    let path = url.to_file_path().ok()?;
    let relative = path.strip_prefix("/").ok()?;
    relative.to_str().map(str::to_string)
}
