//! TOML configuration.
//!
//! Loaded from `<config_dir>/vkinfo/config.toml` (or `--config`), with serde defaults for any
//! missing field. Command-line flags override the file.

use crate::cli::Args;
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use vkinfo_core::{
    CommandProvider, DEFAULT_PROGRAM, DiagnosticProvider, FileProvider, ReportProvider,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("provider kind '{0}' needs a path")]
    MissingPath(&'static str),

    #[error("invalid color for highlight.{field}: '{value}'")]
    InvalidColor { field: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub highlight: HighlightConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Command,
    File,
    Report,
}

impl ProviderKind {
    fn name(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::File => "file",
            Self::Report => "report",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub command: String,
    pub args: Vec<String>,
    pub path: Option<PathBuf>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Command,
            command: DEFAULT_PROGRAM.to_string(),
            args: Vec::new(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub background: String,
    pub foreground: String,
    pub current_background: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            background: "yellow".to_string(),
            foreground: "black".to_string(),
            current_background: "lightred".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Resolved highlight styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub matched: Style,
    pub current: Style,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            matched: Style::default().bg(Color::Yellow).fg(Color::Black),
            current: Style::default().bg(Color::LightRed).fg(Color::Black),
        }
    }
}

impl Palette {
    /// Style for a run covered by `depth` highlights.
    pub fn style_for(&self, depth: usize, current: bool) -> Style {
        if depth == 0 {
            return Style::default();
        }
        let style = if current { self.current } else { self.matched };
        if depth > 1 {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Color::from_str(value).map_err(|_| ConfigError::InvalidColor {
        field,
        value: value.to_string(),
    })
}

impl HighlightConfig {
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let bg = parse_color("background", &self.background)?;
        let fg = parse_color("foreground", &self.foreground)?;
        let current_bg = parse_color("current_background", &self.current_background)?;
        Ok(Palette {
            matched: Style::default().bg(bg).fg(fg),
            current: Style::default().bg(current_bg).fg(fg),
        })
    }
}

/// Platform config path, e.g. `~/.config/vkinfo/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vkinfo").join("config.toml"))
}

impl Config {
    /// Load the config file at `path`.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), otherwise the default path if it exists,
    /// otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(command) = &args.command {
            self.provider.kind = ProviderKind::Command;
            self.provider.command = command.clone();
            self.provider.args = args.args.clone();
        } else if let Some(path) = &args.file {
            self.provider.kind = ProviderKind::File;
            self.provider.path = Some(path.clone());
        } else if let Some(path) = &args.report {
            self.provider.kind = ProviderKind::Report;
            self.provider.path = Some(path.clone());
        }

        if args.log_level.is_some() {
            self.log.level = args.log_level.clone();
        }
        if args.log_file.is_some() {
            self.log.file = args.log_file.clone();
        }
    }

    /// Construct the configured diagnostic provider.
    pub fn build_provider(&self) -> Result<Box<dyn DiagnosticProvider>, ConfigError> {
        let provider = &self.provider;
        let path = || {
            provider
                .path
                .clone()
                .ok_or(ConfigError::MissingPath(provider.kind.name()))
        };
        let built: Box<dyn DiagnosticProvider> = match provider.kind {
            ProviderKind::Command => Box::new(CommandProvider::new(
                provider.command.clone(),
                provider.args.clone(),
            )),
            ProviderKind::File => Box::new(FileProvider::new(path()?)),
            ProviderKind::Report => Box::new(ReportProvider::new(path()?)),
        };
        Ok(built)
    }
}
