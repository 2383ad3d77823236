//! Fixed filesystem roots and template lookup.

use std::path::{Path, PathBuf};

/// The directories a run reads from and writes to, all under one base.
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    pub root: PathBuf,
    pub assets: PathBuf,
    pub templates: PathBuf,
    pub editor: PathBuf,
    pub output: PathBuf,
}

impl Paths {
    /// `assets/`, `templates/`, `editor/` and `out/` under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            assets: root.join("assets"),
            templates: root.join("templates"),
            editor: root.join("editor"),
            output: root.join("out"),
            root,
        }
    }

    /// Find a template by name: the literal path first, then under the
    /// templates directory, then under it with `.json` appended.
    pub fn find_template(&self, name: &str) -> Option<PathBuf> {
        let literal = PathBuf::from(name);
        if literal.is_file() {
            return Some(literal);
        }

        let in_templates = self.templates.join(name);
        if in_templates.is_file() {
            return Some(in_templates);
        }

        let with_suffix = self.templates.join(format!("{}.json", name));
        with_suffix.is_file().then_some(with_suffix)
    }

    /// `out/<template stem>.png`.
    pub fn default_output(&self, template: &Path) -> PathBuf {
        let stem = template
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "thumbnail".to_string());
        self.output.join(format!("{}.png", stem))
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lookup_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = Paths::new(dir.path());
        fs::create_dir_all(&paths.templates).unwrap();
        fs::write(paths.templates.join("intro.json"), "{}").unwrap();
        fs::write(paths.templates.join("raw"), "{}").unwrap();

        assert_eq!(paths.find_template("intro"), Some(paths.templates.join("intro.json")));
        assert_eq!(paths.find_template("intro.json"), Some(paths.templates.join("intro.json")));
        assert_eq!(paths.find_template("raw"), Some(paths.templates.join("raw")));

        let literal = paths.templates.join("intro.json");
        assert_eq!(paths.find_template(literal.to_str().unwrap()), Some(literal));

        assert_eq!(paths.find_template("nonexistent"), None);
    }

    #[test]
    fn default_output_uses_stem() {
        let paths = Paths::new("/srv/thumbs");
        assert_eq!(
            paths.default_output(Path::new("templates/intro.json")),
            PathBuf::from("/srv/thumbs/out/intro.png")
        );
    }
}
