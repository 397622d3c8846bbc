//! Theme cache holding the bundled stylesheets and the highlighter engine.
//!
//! Lifecycle: `Uninitialized -> Loaded` exactly once via [`ThemeCache::initialize`],
//! then `Loaded -> Loaded` on every [`ThemeCache::reload_syntax_theme`].

use crate::assets::{
    syntax_theme_resource, AssetKind, AssetSource, BASE_STYLESHEET, ENGINE_SCRIPT,
};

/// Cached asset text, empty when the asset failed to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetCache {
    pub base_stylesheet: String,
    pub syntax_theme_stylesheet: String,
    pub engine_script: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheState {
    #[default]
    Uninitialized,
    Loaded,
}

#[derive(Debug, Default)]
pub struct ThemeCache {
    assets: AssetCache,
    state: CacheState,
    syntax_theme: String,
}

/// Loads one asset, an unavailable asset degrades to an empty string.
fn load_or_empty(source: &dyn AssetSource, name: &str, kind: AssetKind) -> String {
    match source.load_text(name, kind) {
        Ok(text) => {
            tracing::debug!(name, bytes = text.len(), "Loaded bundled asset");
            text
        }
        Err(err) => {
            tracing::error!(?err, name, "Bundled asset is unavailable, check the packaging");
            String::new()
        }
    }
}

impl ThemeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the base stylesheet, the engine script and the stylesheet of `syntax_theme`.
    ///
    /// Each asset loads independently of the others. Calling this again once
    /// loaded does nothing, use [`Self::reload_syntax_theme`] instead.
    pub fn initialize(&mut self, source: &dyn AssetSource, syntax_theme: &str) {
        if self.state == CacheState::Loaded {
            tracing::debug!("Theme cache is already initialized");
            return;
        }

        self.assets.base_stylesheet =
            load_or_empty(source, BASE_STYLESHEET, AssetKind::Stylesheet);
        self.assets.engine_script = load_or_empty(source, ENGINE_SCRIPT, AssetKind::Script);
        self.load_syntax_theme(source, syntax_theme);

        self.state = CacheState::Loaded;
    }

    /// Replaces the syntax theme stylesheet, leaving the theme-independent assets untouched.
    pub fn reload_syntax_theme(&mut self, source: &dyn AssetSource, syntax_theme: &str) {
        if self.state == CacheState::Uninitialized {
            tracing::warn!(syntax_theme, "Reloading the syntax theme before initialization");
        }

        self.load_syntax_theme(source, syntax_theme);
    }

    fn load_syntax_theme(&mut self, source: &dyn AssetSource, syntax_theme: &str) {
        self.assets.syntax_theme_stylesheet = load_or_empty(
            source,
            &syntax_theme_resource(syntax_theme),
            AssetKind::Stylesheet,
        );
        self.syntax_theme = syntax_theme.to_string();
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    /// Identifier of the syntax theme last requested.
    pub fn syntax_theme(&self) -> &str {
        &self.syntax_theme
    }
}
