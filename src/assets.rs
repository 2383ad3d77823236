//! Asset lookup under a fixed assets root.
//!
//! Assets are referenced either by a relative path (`logos/rust.png`) or by a
//! bare file name (`rust.png`, or `rust` with the extension left off). Bare
//! names are searched recursively. Nothing is cached: every call walks the
//! tree again, so two calls against an unchanged tree agree.

use log::{debug, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Extensions tried, in order, when a bare name has none of its own.
pub const FALLBACK_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "svg", "webp"];

/// Extensions reported by [`AssetResolver::list`].
pub const LISTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "svg", "webp", "gif"];

/// Resolves asset names against a root directory.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
}

impl AssetResolver {
    /// Create a resolver for `root`. The root is made absolute so resolved
    /// paths can be turned into `file://` URLs; it does not need to exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` to an existing file under the root.
    ///
    /// Names containing a path separator are joined onto the root and checked
    /// directly. Bare names are searched for recursively, first verbatim and
    /// then (for extensionless names) with each of [`FALLBACK_EXTENSIONS`].
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }

        if has_separator(name) {
            let candidate = self.root.join(name.trim_start_matches('/'));
            return if candidate.is_file() {
                Some(candidate)
            } else {
                debug!("asset path {} does not exist under {}", name, self.root.display());
                None
            };
        }

        let mut matches = self.find_named(name);

        if matches.is_empty() && Path::new(name).extension().is_none() {
            for ext in FALLBACK_EXTENSIONS {
                matches = self.find_named(&format!("{}.{}", name, ext));
                if !matches.is_empty() {
                    break;
                }
            }
        }

        if matches.len() > 1 {
            let listed = matches
                .iter()
                .map(|p| self.relative(p))
                .collect::<Vec<_>>()
                .join(", ");
            warn!(
                "Multiple matches for '{}': {}; using {}",
                name,
                listed,
                self.relative(&matches[0])
            );
        }

        matches.into_iter().next()
    }

    /// Every listable image under the root, as sorted `/`-separated paths
    /// relative to the root.
    pub fn list(&self) -> Vec<String> {
        let mut assets: Vec<String> = walk_files(&self.root)
            .into_iter()
            .filter(|p| is_listed_image(p))
            .map(|p| self.relative(&p))
            .collect();
        assets.sort();
        assets
    }

    /// Join a request path onto the root, refusing anything that could step
    /// outside of it. Returns `None` for non-files.
    pub fn file_at(&self, relative: &str) -> Option<PathBuf> {
        let rel = Path::new(relative.trim_start_matches('/'));
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        let path = self.root.join(rel);
        path.is_file().then_some(path)
    }

    fn find_named(&self, file_name: &str) -> Vec<PathBuf> {
        walk_files(&self.root)
            .into_iter()
            .filter(|p| p.file_name().map(|n| n == file_name).unwrap_or(false))
            .collect()
    }

    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn has_separator(name: &str) -> bool {
    name.contains('/') || name.contains(std::path::MAIN_SEPARATOR)
}

fn is_listed_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            LISTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Depth-first listing of regular files, visiting each directory's entries in
/// file-name order. Unreadable directories are skipped.
fn walk_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_files(root, &mut files);
    files
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            collect_files(&path, out);
        } else if path.is_file() {
            out.push(path);
        }
    }
}
