pub mod monitor;

use arc_swap::ArcSwap;
use dirs::Dirs;
use quill_core::TextDirection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

static CONFIG: OnceLock<ArcSwap<ConfigInner>> = OnceLock::new();

#[derive(Debug)]
struct ConfigInner {
    config: Arc<Config>,
    file_path: PathBuf,
}

struct LoadedConfig {
    config: Config,
    file_path: PathBuf,
    maybe_error: Option<toml::de::Error>,
}

fn load_config(specified_config_file: Option<PathBuf>) -> LoadedConfig {
    let config_file = specified_config_file.unwrap_or_else(|| {
        let config_file_path = Dirs::config_file();

        if let Some(parent) = config_file_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        config_file_path
    });

    let mut maybe_config_err = None;
    let config = std::fs::read_to_string(&config_file)
        .and_then(|contents| {
            toml::from_str(&contents).map_err(|err| {
                maybe_config_err.replace(err);
                std::io::Error::new(std::io::ErrorKind::Other, "Error occurred in config.toml")
            })
        })
        .unwrap_or_default();

    LoadedConfig {
        config,
        file_path: config_file,
        maybe_error: maybe_config_err,
    }
}

/// Loads the config file and installs it as the global [`Config`].
///
/// A malformed config file falls back to the default config, the parse error
/// is handed back to the caller for reporting.
pub fn load_config_on_startup(
    specified_config_file: Option<PathBuf>,
) -> (Arc<Config>, Option<toml::de::Error>) {
    let LoadedConfig {
        config: loaded_config,
        file_path,
        maybe_error,
    } = load_config(specified_config_file);

    let inner = Arc::new(ConfigInner {
        config: Arc::new(loaded_config),
        file_path,
    });

    match CONFIG.get() {
        Some(current) => current.store(inner),
        None => {
            if let Err(inner) = CONFIG.set(ArcSwap::new(inner)) {
                // Lost the race against another initializer, keep the latest value.
                if let Some(current) = CONFIG.get() {
                    current.store(inner.into_inner());
                }
            }
        }
    }

    (config(), maybe_error)
}

/// Reloads the config from `config_file`, replacing the global config as a whole.
///
/// Readers holding the previous [`Arc<Config>`] keep a consistent snapshot.
pub fn reload_config(config_file: PathBuf) -> Option<toml::de::Error> {
    let LoadedConfig {
        config: loaded_config,
        file_path,
        maybe_error,
    } = load_config(Some(config_file));

    if let Some(current) = CONFIG.get() {
        current.store(Arc::new(ConfigInner {
            config: Arc::new(loaded_config),
            file_path,
        }));
    }

    maybe_error
}

/// [`Config`] is a global singleton, which is explicitly initialized using
/// [`load_config_on_startup`] with an optional custom config file location,
/// otherwise the default config is returned.
pub fn config() -> Arc<Config> {
    config_checked().unwrap_or_default()
}

pub fn config_checked() -> Option<Arc<Config>> {
    CONFIG.get().map(|c| c.load().config.clone())
}

/// Location of the config file in use, `None` before [`load_config_on_startup`].
pub fn config_file() -> Option<PathBuf> {
    CONFIG.get().map(|c| c.load().file_path.clone())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LogConfig {
    /// Specify the log file path.
    ///
    /// This path must be an absolute path.
    pub log_file: Option<String>,

    /// Specify the max log level.
    pub max_level: String,

    /// Specify the log target to enable more detailed logging.
    ///
    /// ```toml
    /// [log]
    /// log-target = "quill_core=trace"
    /// ```
    pub log_target: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            max_level: "debug".into(),
            log_target: "".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct AppearanceConfig {
    /// Let the window background show through instead of the theme background.
    pub use_system_appearance: bool,

    /// Default text direction of the preview, `natural` or `rtl`.
    ///
    /// Any other value is natural.
    pub direction: TextDirection,
}

/// Colors of the preview, each one a `#rgb` or `#rrggbb` hex string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Name of the highlight.js style used for code blocks.
    pub syntax: String,

    pub background: String,

    pub text: String,

    pub code: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            syntax: "github".into(),
            background: "#ffffff".into(),
            text: "#24292e".into(),
            code: "#f6f8fa".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ResourcesConfig {
    /// Directory of the bundled stylesheets and scripts.
    pub dir: Option<PathBuf>,
}

impl ResourcesConfig {
    pub fn resolve_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(Dirs::resources_dir)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ExtensionsConfig {
    /// Directory scanned for `*.js` extension scripts.
    pub dir: Option<PathBuf>,
}

impl ExtensionsConfig {
    pub fn resolve_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(Dirs::plugins_dir)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Log configuration.
    pub log: LogConfig,

    /// Appearance preferences.
    pub appearance: AppearanceConfig,

    /// Theme colors and syntax highlighting style.
    pub theme: ThemeConfig,

    /// Bundled resources location.
    pub resources: ResourcesConfig,

    /// User extensions location.
    pub extensions: ExtensionsConfig,
}
