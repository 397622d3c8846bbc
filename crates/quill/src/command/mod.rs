pub mod extensions;
pub mod render;
pub mod watch;

use clap::Parser;
use quill_config::Config;
use quill_core::{
    Appearance, HexColor, Preview, RenderRequest, ResourceBundle, TextDirection, ThemePalette,
};

/// Render parameters shared by `render` and `watch`.
#[derive(Parser, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Text direction, `rtl` or `natural`, defaults to `[appearance] direction`.
    #[clap(long)]
    pub direction: Option<String>,

    /// Vertical scroll position of the preview in pixels.
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    pub scroll_offset: i64,
}

impl RenderArgs {
    pub fn direction(&self, config: &Config) -> TextDirection {
        self.direction
            .as_deref()
            .map_or(config.appearance.direction, |hint| {
                TextDirection::from_hint(Some(hint))
            })
    }

    pub fn to_request(&self, content: String, config: &Config) -> RenderRequest {
        RenderRequest::new(content)
            .direction(self.direction(config))
            .scroll_offset(self.scroll_offset)
    }
}

/// Loads the bundled assets and the extensions configured in `config`.
pub fn init_preview(config: &Config) -> Preview {
    let resources = config.resources.resolve_dir();
    let extensions_dir = config.extensions.resolve_dir();

    tracing::debug!(
        resources = %resources.display(),
        extensions = %extensions_dir.display(),
        "Initializing preview"
    );

    Preview::initialize(
        Box::new(ResourceBundle::new(resources)),
        &config.theme.syntax,
        &extensions_dir,
    )
}

/// Reads the current palette and preferences, an invalid color keeps the default one.
pub fn appearance(config: &Config) -> Appearance {
    let default = ThemePalette::default();

    let color = |name: &str, value: &str, fallback: HexColor| {
        HexColor::parse(value).unwrap_or_else(|err| {
            tracing::warn!(%err, name, "Invalid theme color, using {fallback}");
            fallback
        })
    };

    Appearance {
        palette: ThemePalette {
            background: color("background", &config.theme.background, default.background),
            text: color("text", &config.theme.text, default.text),
            code: color("code", &config.theme.code, default.code),
        },
        use_system_appearance: config.appearance.use_system_appearance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appearance_from_config() {
        let mut config = Config::default();
        config.theme.background = "#272822".into();
        config.theme.text = "white".into();
        config.appearance.use_system_appearance = true;

        let appearance = appearance(&config);
        assert_eq!(appearance.palette.background.as_str(), "#272822");
        assert_eq!(appearance.palette.text, ThemePalette::default().text);
        assert!(appearance.use_system_appearance);
    }

    #[test]
    fn test_direction_override() {
        let mut config = Config::default();
        let args = RenderArgs::default();
        assert_eq!(args.direction(&config), TextDirection::Natural);

        config.appearance.direction = TextDirection::RightToLeft;
        assert_eq!(args.direction(&config), TextDirection::RightToLeft);

        let args = RenderArgs {
            direction: Some("natural".into()),
            scroll_offset: 10,
        };
        assert_eq!(args.direction(&config), TextDirection::Natural);
        assert_eq!(args.to_request("<p>x</p>".into(), &config).scroll_offset, 10);
    }
}
