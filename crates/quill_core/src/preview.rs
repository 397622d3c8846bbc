//! Owner of the preview state: the theme cache and the extension list.

use crate::assets::AssetSource;
use crate::cache::ThemeCache;
use crate::document::{assemble, RenderRequest};
use crate::extensions::{discover, ExtensionScripts};
use crate::theme::Appearance;
use std::path::Path;

/// Preview renderer, populated once at startup and read on every render.
///
/// Not synchronized: the caller owns it from a single coordination context,
/// a reload must complete before the next render is issued.
pub struct Preview {
    source: Box<dyn AssetSource>,
    cache: ThemeCache,
    extensions: ExtensionScripts,
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("cache", &self.cache)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl Preview {
    /// Loads the bundled assets and discovers the extension scripts.
    pub fn initialize(
        source: Box<dyn AssetSource>,
        syntax_theme: &str,
        extensions_dir: &Path,
    ) -> Self {
        let mut cache = ThemeCache::new();
        cache.initialize(source.as_ref(), syntax_theme);

        let extensions = discover(extensions_dir);

        tracing::info!(
            syntax_theme,
            extensions = extensions.len(),
            "Initialized preview"
        );

        Self {
            source,
            cache,
            extensions,
        }
    }

    /// Builds the document for `request` from the cached state.
    pub fn render(&self, appearance: &Appearance, request: &RenderRequest) -> String {
        assemble(self.cache.assets(), &self.extensions, appearance, request)
    }

    /// Reloads the syntax theme stylesheet, call it whenever the active syntax theme changes.
    pub fn reload_syntax_theme(&mut self, syntax_theme: &str) {
        tracing::debug!(
            from = self.cache.syntax_theme(),
            to = syntax_theme,
            "Reloading syntax theme"
        );
        self.cache
            .reload_syntax_theme(self.source.as_ref(), syntax_theme);
    }

    pub fn rescan_extensions(&mut self, extensions_dir: &Path) {
        self.extensions.rescan(extensions_dir);
    }

    pub fn syntax_theme(&self) -> &str {
        self.cache.syntax_theme()
    }

    pub fn cache(&self) -> &ThemeCache {
        &self.cache
    }

    pub fn extensions(&self) -> &ExtensionScripts {
        &self.extensions
    }
}
