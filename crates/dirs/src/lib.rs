use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::OnceLock;

pub struct Dirs;

impl Dirs {
    /// Project directory specifically for Quill.
    ///
    /// The config file, the bundled resources and the user extensions live there.
    pub fn project() -> &'static ProjectDirs {
        static CELL: OnceLock<ProjectDirs> = OnceLock::new();

        CELL.get_or_init(|| {
            ProjectDirs::from("org", "quill", "Quill")
                .expect("Couldn't create project directory for quill")
        })
    }

    /// Default location of the config file.
    ///
    /// Linux: ~/.config/quill/config.toml
    /// macOS: ~/Library/Application\ Support/org.quill.Quill/config.toml
    /// Windows: ~\AppData\Roaming\quill\Quill\config\config.toml
    pub fn config_file() -> PathBuf {
        Self::project().config_dir().join("config.toml")
    }

    /// Default directory of the bundled stylesheets and scripts.
    pub fn resources_dir() -> PathBuf {
        Self::project().data_dir().join("resources")
    }

    /// Default directory scanned for user-installed extension scripts.
    pub fn plugins_dir() -> PathBuf {
        Self::project().data_dir().join("plugins")
    }
}
