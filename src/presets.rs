//! Dish presets: named duration shortcuts with an icon, distinct from the
//! plain minute-preset buttons.

use crate::i18n::{tr, Lang, Phrase};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DishPreset {
    pub name: String,
    pub icon: String,
    pub seconds: u64,
}

impl DishPreset {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, seconds: u64) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            seconds,
        }
    }

    /// `MM:SS` caption shown next to the dish name.
    pub fn duration_label(&self) -> String {
        crate::snapshot::format_mmss(self.seconds)
    }
}

/// The built-in dish table, localized. Used whenever the configuration does
/// not supply its own list.
pub fn default_dish_presets(lang: Lang) -> Vec<DishPreset> {
    vec![
        DishPreset::new(tr(lang, Phrase::EggSoft), "🥚", 240),
        DishPreset::new(tr(lang, Phrase::EggMedium), "🥚", 360),
        DishPreset::new(tr(lang, Phrase::EggHard), "🥚", 540),
        DishPreset::new(tr(lang, Phrase::PastaAlDente), "🍝", 480),
        DishPreset::new(tr(lang, Phrase::PastaSoft), "🍝", 600),
        DishPreset::new(tr(lang, Phrase::Rice), "🍚", 720),
        DishPreset::new(tr(lang, Phrase::Potatoes), "🥔", 1200),
        DishPreset::new(tr(lang, Phrase::RoastAromas), "🔥", 180),
    ]
}
