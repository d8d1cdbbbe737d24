//! In-card configuration editor.
//!
//! A flat field list driven by the keyboard: Up/Down select a field, Enter
//! opens a text buffer seeded with the current value (or toggles/cycles
//! fields that have no free text), Esc abandons the buffer. Every committed
//! change emits the complete updated configuration, never a partial patch,
//! so the surrounding dashboard can persist it wholesale.

use crate::config::CardConfig;
use crate::i18n::Lang;
use crate::presets::DishPreset;
use crate::snapshot::parse_duration;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use strum_macros::Display;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Field {
    Entity,
    Name,
    Icon,
    Language,
    Presets,
    AlertThreshold,
    SoundEnabled,
    SoundFile,
    Volume,
    SoundRepeat,
    ShowDishPresets,
    DishPresets,
    PrimaryColor,
    AlertColor,
    ShowSeconds,
}

pub const FIELDS: &[Field] = &[
    Field::Entity,
    Field::Name,
    Field::Icon,
    Field::Language,
    Field::Presets,
    Field::AlertThreshold,
    Field::SoundEnabled,
    Field::SoundFile,
    Field::Volume,
    Field::SoundRepeat,
    Field::ShowDishPresets,
    Field::DishPresets,
    Field::PrimaryColor,
    Field::AlertColor,
    Field::ShowSeconds,
];

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Entity => "Timer entity",
            Field::Name => "Title",
            Field::Icon => "Icon",
            Field::Language => "Language",
            Field::Presets => "Minute presets",
            Field::AlertThreshold => "Alert threshold (s)",
            Field::SoundEnabled => "Sound",
            Field::SoundFile => "Sound file",
            Field::Volume => "Volume",
            Field::SoundRepeat => "Sound repeats",
            Field::ShowDishPresets => "Show dishes",
            Field::DishPresets => "Dishes (icon,name,mm:ss)",
            Field::PrimaryColor => "Primary color",
            Field::AlertColor => "Alert color",
            Field::ShowSeconds => "Show seconds",
        }
    }

    fn is_toggle(self) -> bool {
        matches!(
            self,
            Field::SoundEnabled | Field::ShowDishPresets | Field::ShowSeconds
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    /// The full, updated configuration after a committed edit.
    ConfigChanged(CardConfig),
}

pub struct ConfigEditor {
    config: CardConfig,
    cursor: usize,
    buffer: String,
    editing: bool,
}

impl ConfigEditor {
    pub fn new(config: CardConfig) -> Self {
        Self {
            config,
            cursor: 0,
            buffer: String::new(),
            editing: false,
        }
    }

    pub fn selected(&self) -> Field {
        FIELDS[self.cursor]
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Rendered value for a field row.
    pub fn field_value(&self, field: Field) -> String {
        let cfg = &self.config;
        match field {
            Field::Entity => cfg.entity.clone(),
            Field::Name => cfg.name.clone(),
            Field::Icon => cfg.icon.clone(),
            Field::Language => cfg.language.clone(),
            Field::Presets => cfg
                .presets
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(","),
            Field::AlertThreshold => cfg.alert_threshold_secs.to_string(),
            Field::SoundEnabled => on_off(cfg.sound_enabled),
            Field::SoundFile => cfg
                .sound_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            Field::Volume => format!("{:.2}", cfg.clamped_volume()),
            Field::SoundRepeat => cfg.sound_repeat.to_string(),
            Field::ShowDishPresets => on_off(cfg.show_dish_presets),
            Field::DishPresets => {
                let dishes = cfg.effective_dish_presets();
                format!("{} entries", dishes.len())
            }
            Field::PrimaryColor => cfg.primary_color.clone(),
            Field::AlertColor => cfg.alert_color.clone(),
            Field::ShowSeconds => on_off(cfg.show_seconds),
        }
    }

    /// Feed one key press. Returns an event whenever the configuration
    /// actually changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<EditorEvent> {
        if self.editing {
            return self.handle_buffer_key(key.code);
        }
        match key.code {
            KeyCode::Up => {
                self.cursor = self.cursor.checked_sub(1).unwrap_or(FIELDS.len() - 1);
                None
            }
            KeyCode::Down => {
                self.cursor = (self.cursor + 1) % FIELDS.len();
                None
            }
            KeyCode::Char(' ') => self.activate(),
            KeyCode::Enter => {
                let field = self.selected();
                if field.is_toggle() || field == Field::Language {
                    self.activate()
                } else {
                    self.begin_edit();
                    None
                }
            }
            KeyCode::Backspace if self.selected() == Field::DishPresets => self.pop_dish(),
            _ => None,
        }
    }

    fn handle_buffer_key(&mut self, code: KeyCode) -> Option<EditorEvent> {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.buffer.clear();
                None
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                None
            }
            KeyCode::Enter => {
                self.editing = false;
                let text = std::mem::take(&mut self.buffer);
                self.commit(self.selected(), &text)
            }
            KeyCode::Char(c) => {
                self.buffer.push(c);
                None
            }
            _ => None,
        }
    }

    fn begin_edit(&mut self) {
        self.editing = true;
        self.buffer = match self.selected() {
            // Dish rows are appended, so the buffer starts empty.
            Field::DishPresets => String::new(),
            field => self.field_value(field),
        };
    }

    /// Toggle or cycle the selected field in place.
    fn activate(&mut self) -> Option<EditorEvent> {
        let selected = self.selected();
        let cfg = &mut self.config;
        match selected {
            Field::SoundEnabled => cfg.sound_enabled = !cfg.sound_enabled,
            Field::ShowDishPresets => cfg.show_dish_presets = !cfg.show_dish_presets,
            Field::ShowSeconds => cfg.show_seconds = !cfg.show_seconds,
            Field::Language => {
                cfg.language = match Lang::from_tag(&cfg.language) {
                    Lang::De => "en",
                    Lang::En => "es",
                    Lang::Es => "nds",
                    Lang::Nds => "de",
                }
                .to_string();
            }
            _ => return None,
        }
        Some(self.changed())
    }

    fn commit(&mut self, field: Field, text: &str) -> Option<EditorEvent> {
        let text = text.trim();
        let cfg = &mut self.config;
        match field {
            Field::Entity => cfg.entity = text.to_string(),
            Field::Name => cfg.name = text.to_string(),
            Field::Icon => cfg.icon = text.to_string(),
            Field::Language => cfg.language = text.to_string(),
            Field::Presets => {
                let mut minutes: Vec<u64> =
                    text.split(',').filter_map(|p| p.trim().parse().ok()).collect();
                minutes.sort_unstable();
                minutes.dedup();
                cfg.presets = minutes;
            }
            Field::AlertThreshold => cfg.alert_threshold_secs = text.parse().unwrap_or(0),
            Field::SoundFile => {
                cfg.sound_file = if text.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(text))
                };
            }
            Field::Volume => {
                let parsed: f32 = text.parse().unwrap_or(0.7);
                cfg.volume = if parsed.is_finite() {
                    parsed.clamp(0.0, 1.0)
                } else {
                    0.7
                };
            }
            Field::SoundRepeat => cfg.sound_repeat = text.parse::<u32>().unwrap_or(1).max(1),
            Field::DishPresets => {
                let Some(dish) = parse_dish(text) else {
                    debug!(%text, "ignoring malformed dish entry");
                    return None;
                };
                // First custom edit snapshots the built-ins so the user
                // extends the visible list instead of replacing it.
                let mut dishes = cfg.effective_dish_presets();
                dishes.push(dish);
                cfg.dish_presets = Some(dishes);
            }
            Field::PrimaryColor => cfg.primary_color = text.to_string(),
            Field::AlertColor => cfg.alert_color = text.to_string(),
            Field::SoundEnabled | Field::ShowDishPresets | Field::ShowSeconds => return None,
        }
        Some(self.changed())
    }

    /// Remove the most recently listed dish.
    fn pop_dish(&mut self) -> Option<EditorEvent> {
        let mut dishes = self.config.effective_dish_presets();
        dishes.pop()?;
        self.config.dish_presets = Some(dishes);
        Some(self.changed())
    }

    fn changed(&self) -> EditorEvent {
        EditorEvent::ConfigChanged(self.config.clone())
    }
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

/// Parse an `icon,name,mm:ss` dish row. The duration accepts the same
/// shapes the readout parser does.
fn parse_dish(text: &str) -> Option<DishPreset> {
    let mut parts = text.splitn(3, ',');
    let icon = parts.next()?.trim();
    let name = parts.next()?.trim();
    let duration = parts.next()?.trim();
    if name.is_empty() {
        return None;
    }
    let seconds = parse_duration(duration);
    if seconds == 0 {
        return None;
    }
    Some(DishPreset::new(name, icon, seconds))
}
