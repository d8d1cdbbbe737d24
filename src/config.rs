//! Card configuration: schema, defaults, validation and on-disk persistence.
//!
//! Every field except the timer entity id is optional with a default, so a
//! minimal config is just `{"entity": "timer.kitchen"}`. A missing entity id
//! is a fatal setup error; everything else degrades gracefully.

use crate::presets::DishPreset;
use anyhow::{bail, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_PRIMARY_COLOR: &str = "#4CAF50";
pub const DEFAULT_ALERT_COLOR: &str = "#FF5722";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardConfig {
    /// Required id of the host timer entity, e.g. `timer.kitchen`.
    #[serde(default)]
    pub entity: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Language tag; unrecognized tags fall back to the default language.
    #[serde(default = "default_language")]
    pub language: String,
    /// Minute presets rendered as one-tap buttons.
    #[serde(default = "default_presets")]
    pub presets: Vec<u64>,
    /// Custom dish presets; `None` means the built-in localized table.
    #[serde(default)]
    pub dish_presets: Option<Vec<DishPreset>>,
    #[serde(default = "default_true")]
    pub show_dish_presets: bool,
    /// Visual alert kicks in when remaining time drops to this many seconds.
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold_secs: u64,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// External sound file; takes priority over the inline payload.
    #[serde(default)]
    pub sound_file: Option<PathBuf>,
    /// Base64-encoded sound payload; used when no file is configured.
    #[serde(default)]
    pub sound_data: Option<String>,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_sound_repeat")]
    pub sound_repeat: u32,
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_alert_color")]
    pub alert_color: String,
    #[serde(default = "default_true")]
    pub show_seconds: bool,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            entity: String::new(),
            name: default_name(),
            icon: default_icon(),
            language: default_language(),
            presets: default_presets(),
            dish_presets: None,
            show_dish_presets: true,
            alert_threshold_secs: default_alert_threshold(),
            sound_enabled: true,
            sound_file: None,
            sound_data: None,
            volume: default_volume(),
            sound_repeat: default_sound_repeat(),
            primary_color: default_primary_color(),
            alert_color: default_alert_color(),
            show_seconds: true,
            log_level: LogLevel::default(),
        }
    }
}

impl CardConfig {
    /// Setup-time validation. Only the entity id is load-bearing; numeric
    /// fields are clamped at their point of use instead of rejected here.
    pub fn validate(&self) -> Result<()> {
        if self.entity.trim().is_empty() {
            bail!("configuration must specify a timer entity id (e.g. \"timer.kitchen\")");
        }
        Ok(())
    }

    pub fn lang(&self) -> crate::i18n::Lang {
        crate::i18n::Lang::from_tag(&self.language)
    }

    /// Volume clamped into the playable range.
    pub fn clamped_volume(&self) -> f32 {
        if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            default_volume()
        }
    }

    /// Repeat count with the minimum of one enforced.
    pub fn effective_repeats(&self) -> u32 {
        self.sound_repeat.max(1)
    }

    /// Dish presets in effect: custom ones when configured and non-empty,
    /// otherwise the localized built-in table.
    pub fn effective_dish_presets(&self) -> Vec<DishPreset> {
        match &self.dish_presets {
            Some(list) if !list.is_empty() => list.clone(),
            _ => crate::presets::default_dish_presets(self.lang()),
        }
    }

    pub fn primary_rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(&self.primary_color).unwrap_or((0x4c, 0xaf, 0x50))
    }

    pub fn alert_rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(&self.alert_color).unwrap_or((0xff, 0x57, 0x22))
    }
}

/// Parse `#RRGGBB` into an RGB triple. Returns `None` on anything malformed
/// so callers can fall back to their default color.
pub fn parse_hex_color(text: &str) -> Option<(u8, u8, u8)> {
    let hex = text.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Logging verbosity, exposed in the config so dashboards can quiet the card.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> CardConfig;
    fn save(&self, cfg: &CardConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "simmer") {
            pd.config_dir().join("card.json")
        } else {
            PathBuf::from("simmer_card.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> CardConfig {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<CardConfig>(&bytes) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!(path = %self.path.display(), "Invalid card config, using defaults: {err}");
                    CardConfig::default()
                }
            },
            Err(_) => CardConfig::default(),
        }
    }

    fn save(&self, cfg: &CardConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

fn default_name() -> String {
    "Kitchen Timer".to_string()
}

fn default_icon() -> String {
    "⏲".to_string()
}

fn default_language() -> String {
    "de".to_string()
}

fn default_presets() -> Vec<u64> {
    vec![5, 10, 15, 20]
}

fn default_alert_threshold() -> u64 {
    60
}

fn default_volume() -> f32 {
    0.7
}

fn default_sound_repeat() -> u32 {
    3
}

fn default_primary_color() -> String {
    DEFAULT_PRIMARY_COLOR.to_string()
}

fn default_alert_color() -> String {
    DEFAULT_ALERT_COLOR.to_string()
}

fn default_true() -> bool {
    true
}
