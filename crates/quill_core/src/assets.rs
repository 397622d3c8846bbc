//! Bundled web assets for the preview document.
//!
//! The embedding browser surface cannot load local files by reference, so every
//! local stylesheet and script is read here once and later inlined verbatim into
//! the generated document.
//!
//! Resource names are a fixed contract with the packaging:
//! - `Markdown.css`: base stylesheet
//! - `highlight-js/highlight.js`: syntax highlighter engine
//! - `highlight-js/styles/<id>.css`: one stylesheet per syntax theme

use std::path::PathBuf;

/// Base stylesheet resource.
pub const BASE_STYLESHEET: &str = "Markdown";

/// Syntax highlighter engine script resource.
pub const ENGINE_SCRIPT: &str = "highlight-js/highlight";

/// Directory of the syntax theme stylesheets within the bundle.
const SYNTAX_THEMES_DIR: &str = "highlight-js/styles";

/// Returns the resource name of the stylesheet for the given syntax theme.
pub fn syntax_theme_resource(syntax_theme: &str) -> String {
    format!("{SYNTAX_THEMES_DIR}/{syntax_theme}")
}

/// Type of a bundled resource, determines the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Stylesheet,
    Script,
}

impl AssetKind {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Stylesheet => "css",
            Self::Script => "js",
        }
    }
}

/// Error type for loading a bundled resource.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("resource {} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read resource {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The resource name would resolve outside of the bundle.
    #[error("invalid resource name: {0}")]
    InvalidName(String),
}

/// A set of bundled text resources addressed by name and kind.
pub trait AssetSource: Send + Sync {
    /// Reads the full UTF-8 text of the named resource.
    ///
    /// No retries: a failure means the resource is absent for the whole process lifetime.
    fn load_text(&self, name: &str, kind: AssetKind) -> Result<String, AssetError>;
}

/// Resources shipped alongside the application in a directory on disk.
#[derive(Debug, Clone)]
pub struct ResourceBundle {
    root: PathBuf,
}

impl ResourceBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves `<root>/<name>.<ext>`.
    pub fn resource_path(&self, name: &str, kind: AssetKind) -> Result<PathBuf, AssetError> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.{}", kind.extension())))
    }
}

impl AssetSource for ResourceBundle {
    fn load_text(&self, name: &str, kind: AssetKind) -> Result<String, AssetError> {
        let path = self.resource_path(name, kind)?;

        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound { path }
            } else {
                AssetError::Io { path, source }
            }
        })
    }
}

fn validate_name(name: &str) -> Result<(), AssetError> {
    let escapes_bundle = name.is_empty()
        || name.starts_with('/')
        || name.contains('\\')
        || name.split('/').any(|segment| segment == ".." || segment.is_empty());

    if escapes_bundle {
        Err(AssetError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}
