// SPDX-License-Identifier: MIT
//
// Configuration for the asciir demo.
//
// A single TOML file, every key optional. Values arrive as plain strings and
// numbers and are checked once at load time, so the render loop only ever
// sees resolved colors and an attribute policy.
//
//   frames      = 240          # frames to draw before exiting
//   frame_ms    = 33           # delay between frames
//   bold_offset = 40           # per-channel brightening for bold
//   policy      = "auto"       # "ansi" | "console" | "auto"
//   background  = "#101018"
//   foreground  = "#e0e0e0"
//   symbol      = "#"
//   log_file    = "asciir.log"

use std::fs;
use std::path::{Path, PathBuf};

use ar_term::attr::AttrPolicy;
use ar_term::color::Color;
use serde::Deserialize;
use thiserror::Error;

/// File looked for in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "asciir.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("'{field}' is not a color: {value:?} (expected #rrggbb or #rrggbbaa)")]
    InvalidColor { field: &'static str, value: String },

    #[error("unknown attribute policy {0:?} (expected \"ansi\", \"console\" or \"auto\")")]
    InvalidPolicy(String),
}

/// Raw settings as written in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub frames: u32,
    pub frame_ms: u64,
    pub bold_offset: u8,
    pub policy: String,
    pub background: String,
    pub foreground: String,
    pub symbol: char,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frames: 240,
            frame_ms: 33,
            bold_offset: ar_term::attr::DEFAULT_BOLD_OFFSET,
            policy: "auto".to_owned(),
            background: "#101018".to_owned(),
            foreground: "#e0e0e0".to_owned(),
            symbol: '#',
            log_file: None,
        }
    }
}

/// Settings checked and converted for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub frames: u32,
    pub frame_ms: u64,
    pub bold_offset: u8,
    pub policy: AttrPolicy,
    pub background: Color,
    pub foreground: Color,
    pub symbol: char,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists, or
    /// fall back to defaults.
    ///
    /// An explicitly named file must exist.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] or [`ConfigError::Parse`] for a file that
    /// cannot be used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// # Errors
    ///
    /// Fails on malformed TOML, wrong value types, or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Resolve colors and the attribute policy.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidColor`] or [`ConfigError::InvalidPolicy`].
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        Ok(Settings {
            frames: self.frames,
            frame_ms: self.frame_ms,
            bold_offset: self.bold_offset,
            policy: parse_policy(&self.policy)?,
            background: parse_color("background", &self.background)?,
            foreground: parse_color("foreground", &self.foreground)?,
            symbol: self.symbol,
            log_file: self.log_file.clone(),
        })
    }
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Color::hex(value).ok_or_else(|| ConfigError::InvalidColor {
        field,
        value: value.to_owned(),
    })
}

fn parse_policy(value: &str) -> Result<AttrPolicy, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "ansi" => Ok(AttrPolicy::Ansi),
        "console" => Ok(AttrPolicy::Console),
        "auto" => Ok(AttrPolicy::detect()),
        _ => Err(ConfigError::InvalidPolicy(value.to_owned())),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_overrides_some_keys() {
        let config = Config::from_toml(
            r##"
            frames = 3
            policy = "console"
            background = "#ff000080"
            symbol = "*"
            log_file = "/tmp/asciir.log"
            "##,
        )
        .unwrap();

        assert_eq!(config.frames, 3);
        assert_eq!(config.frame_ms, 33);

        let settings = config.resolve().unwrap();
        assert_eq!(settings.policy, AttrPolicy::Console);
        assert_eq!(settings.background, Color::rgba(255, 0, 0, 128));
        assert_eq!(settings.foreground, Color::new(0xe0, 0xe0, 0xe0));
        assert_eq!(settings.symbol, '*');
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/asciir.log")));
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let err = Config::from_toml("colour = \"#000000\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = Config::from_toml("frames = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bad_color_names_the_field() {
        let config = Config {
            foreground: "white".to_owned(),
            ..Config::default()
        };
        let err = config.resolve().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidColor {
                field: "foreground",
                ..
            }
        ));
        assert!(err.to_string().contains("'foreground'"));
    }

    #[test]
    fn bad_policy_is_rejected() {
        let config = Config {
            policy: "vt52".to_owned(),
            ..Config::default()
        };
        assert!(matches!(
            config.resolve().unwrap_err(),
            ConfigError::InvalidPolicy(p) if p == "vt52"
        ));
    }

    #[test]
    fn policy_is_case_insensitive() {
        assert_eq!(parse_policy("ANSI").unwrap(), AttrPolicy::Ansi);
        assert_eq!(parse_policy("auto").unwrap(), AttrPolicy::detect());
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let err = Config::load(Some(Path::new("/nonexistent/asciir.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
