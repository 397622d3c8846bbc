//! Discovery of user-installed extension scripts.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::Path;

/// Only files with this extension are attached to the document.
pub const SCRIPT_EXTENSION: &str = "js";

/// Characters that may not appear raw in a quoted `src` attribute or a file URL path.
const FILE_URL_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'&');

/// Ordered extension script references, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionScripts(Vec<String>);

impl ExtensionScripts {
    pub fn new(scripts: Vec<String>) -> Self {
        Self(scripts)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Replaces the list with the current content of `dir`.
    pub fn rescan(&mut self, dir: &Path) {
        *self = discover(dir);
    }

    /// One `<script src>` tag per script, executed in discovery order.
    pub fn script_tags(&self) -> String {
        self.0
            .iter()
            .map(|src| format!(r#"<script src="{src}"></script>"#))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Converts an absolute path to a `file://` URL usable in a `src` attribute.
fn to_file_url(path: &Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");
    let path = if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    };
    format!("file://{}", utf8_percent_encode(&path, FILE_URL_PATH))
}

/// Lists the extension scripts in `dir`.
///
/// A missing or unreadable directory yields an empty list, extensions are optional.
pub fn discover(dir: &Path) -> ExtensionScripts {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(?err, dir = %dir.display(), "Failed to read the extensions directory");
            return ExtensionScripts::default();
        }
    };

    let mut paths = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map_or(false, |ext| ext == SCRIPT_EXTENSION)
        })
        .collect::<Vec<_>>();

    // `read_dir` order is platform dependent.
    paths.sort();

    let dir = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    let scripts = paths
        .iter()
        .filter_map(|path| path.file_name().map(|name| to_file_url(&dir.join(name))))
        .collect::<Vec<_>>();

    tracing::debug!(count = scripts.len(), dir = %dir.display(), "Discovered extension scripts");

    ExtensionScripts(scripts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_scripts_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.js", "note.txt", "a.js", "c.JS.bak"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("folder.js")).unwrap();

        let scripts = discover(dir.path());
        assert_eq!(scripts.len(), 2);

        let scripts = scripts.iter().collect::<Vec<_>>();
        assert!(scripts[0].starts_with("file://"));
        assert!(scripts[0].ends_with("/a.js"));
        assert!(scripts[1].ends_with("/b.js"));
    }

    #[test]
    fn test_script_tags() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.js", "b.js", "note.txt"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let tags = discover(dir.path()).script_tags();
        assert_eq!(tags.matches("<script src=").count(), 2);
        assert!(!tags.contains("note.txt"));

        let a = tags.find("a.js").unwrap();
        let b = tags.find("b.js").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let scripts = discover(&dir.path().join("nonexistent"));
        assert!(scripts.is_empty());
        assert_eq!(scripts.script_tags(), "");
    }

    #[test]
    fn test_unsafe_characters_are_encoded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(r#"my "ext" <x>.js"#), "").unwrap();

        let scripts = discover(dir.path());
        let src = scripts.iter().next().unwrap();
        assert!(src.ends_with("/my%20%22ext%22%20%3Cx%3E.js"));
    }

    #[test]
    fn test_rescan() {
        let dir = tempfile::tempdir().unwrap();
        let mut scripts = discover(dir.path());
        assert!(scripts.is_empty());

        std::fs::write(dir.path().join("late.js"), "").unwrap();
        scripts.rescan(dir.path());
        assert_eq!(scripts.len(), 1);
    }
}
