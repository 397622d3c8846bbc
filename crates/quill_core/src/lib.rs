//! Core library of the quill live preview.
//!
//! This crate assembles the complete HTML document shown in the embedded
//! browser surface from an HTML content fragment produced elsewhere.
//!
//! # Modules
//!
//! - [`assets`] - Loading of the bundled stylesheets and scripts
//! - [`cache`] - Theme cache with its `uninitialized -> loaded` lifecycle
//! - [`extensions`] - Discovery of user-installed extension scripts
//! - [`theme`] - Palette, appearance and text direction
//! - [`document`] - The document assembler
//! - [`preview`] - Owner of the cache and the extension list

pub mod assets;
pub mod cache;
pub mod document;
pub mod extensions;
pub mod preview;
pub mod theme;

// Re-export commonly used types at crate root
pub use assets::{AssetError, AssetKind, AssetSource, ResourceBundle};
pub use cache::{AssetCache, CacheState, ThemeCache};
pub use document::{assemble, theme_overrides, RenderRequest};
pub use extensions::{discover, ExtensionScripts};
pub use preview::Preview;
pub use theme::{Appearance, HexColor, TextDirection, ThemeError, ThemePalette};
