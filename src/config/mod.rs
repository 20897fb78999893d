//! Configuration for the selector and pager.
//!
//! Read from `~/.config/runnel/config.toml` at startup. A commented default
//! file is written on first run; missing fields fall back to defaults.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::{KeybindingConfig, PagerKeys, SelectorKeys};

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_config_path()?)
    }

    /// Load configuration from `config_path`, creating it if missing.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        let config_path = config_path.to_path_buf();

        if !config_path.exists() {
            // Create default config with comments
            Self::create_default_config(&config_path)?;
            tracing::info!(path = ?config_path, "wrote default config");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// `~/.config/runnel/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// `~/.config/runnel`, home of the config and the subscription list.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("runnel"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# runnel configuration
#
# Colors can be specified as:
# - Named colors: Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
#   DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
#   LightCyan, White, Reset
# - Hex colors: "#RRGGBB" or "#RGB"
#
# Keybindings can be specified as:
# - Single characters: "a", "G", "/"
# - Special keys: Enter, Tab, BackTab, Backspace, Delete, Home, End,
#   PageUp, PageDown, Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter"
#
# q, Esc and Ctrl+c always quit the pager, and Esc and Ctrl+c always leave
# the selector, in addition to anything bound below.

[colors]
# Title and scroll bars in the pager
border = "DarkGray"
title = "White"
scroll_info = "Cyan"

# Selector
prompt = "Cyan"
counter = "Yellow"
selection_bg = "DarkGray"
selection_fg = "White"
match_highlight = "Green"
marked = "Magenta"
preview_border = "DarkGray"

# Status line for errors shown inside the selector
status_fg = "White"
status_bg = "Red"

[keybindings.pager]
quit = ["q", "Esc", "Ctrl+c"]
scroll_up = ["k", "Up"]
scroll_down = ["j", "Down"]
page_up = ["b", "PageUp"]
page_down = ["f", "Space", "PageDown"]
top = ["g", "Home"]
bottom = ["G", "End"]
open_in_browser = ["o"]

# Plain characters always edit the query, so selector keys need a
# modifier or must be special keys.
[keybindings.selector]
up = ["Up", "Ctrl+k", "Ctrl+p"]
down = ["Down", "Ctrl+j", "Ctrl+n"]
toggle_mark = ["Tab"]
accept = ["Enter"]
abort = ["Esc", "Ctrl+c", "Ctrl+d"]
clear_query = ["Ctrl+u"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
