use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],

    /// Pace presentation to the display refresh.
    #[serde(default = "default_vsync")]
    pub vsync: bool,

    /// Root for `shaders/` and `textures/`, relative to the working directory.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            clear_color: default_clear_color(),
            vsync: default_vsync(),
            asset_dir: default_asset_dir(),
        }
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_title() -> String {
    "LearnOpenGL".to_string()
}

fn default_clear_color() -> [f32; 4] {
    [0.2, 0.3, 0.3, 1.0]
}

fn default_vsync() -> bool {
    true
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets")
}

impl Config {
    /// Loads `$XDG_CONFIG_HOME/learngl/config.toml`, or defaults when there is none.
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Self::load_from(&config_dir.join("learngl").join("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}
