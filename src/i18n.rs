//! Static translation table for the card's labels.
//!
//! Four languages ship with the card; an unrecognized tag falls back to
//! German, which is what the original dashboards were written for.

use crate::snapshot::TimerState;
use strum_macros::Display;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Lang {
    #[default]
    De,
    En,
    Es,
    /// Plattdüütsch
    Nds,
}

impl Lang {
    /// Resolve a configured language tag, defaulting on anything unknown.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "de" => Lang::De,
            "en" => Lang::En,
            "es" => Lang::Es,
            "nds" => Lang::Nds,
            _ => Lang::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phrase {
    Ready,
    Running,
    Paused,
    Pause,
    Resume,
    Stop,
    Ok,
    Min,
    Sec,
    SelectDish,
    EggSoft,
    EggMedium,
    EggHard,
    PastaAlDente,
    PastaSoft,
    Rice,
    Potatoes,
    RoastAromas,
}

/// Look up a phrase in the given language.
pub fn tr(lang: Lang, phrase: Phrase) -> &'static str {
    match lang {
        Lang::De => de(phrase),
        Lang::En => en(phrase),
        Lang::Es => es(phrase),
        Lang::Nds => nds(phrase),
    }
}

/// Localized label for a timer state badge.
pub fn state_label(lang: Lang, state: TimerState) -> &'static str {
    let phrase = match state {
        TimerState::Idle => Phrase::Ready,
        TimerState::Active => Phrase::Running,
        TimerState::Paused => Phrase::Paused,
    };
    tr(lang, phrase)
}

fn de(phrase: Phrase) -> &'static str {
    match phrase {
        Phrase::Ready => "Bereit",
        Phrase::Running => "Läuft",
        Phrase::Paused => "Pause",
        Phrase::Pause => "Pause",
        Phrase::Resume => "Weiter",
        Phrase::Stop => "Stop",
        Phrase::Ok => "OK",
        Phrase::Min => "Min",
        Phrase::Sec => "Sek",
        Phrase::SelectDish => "Gericht wählen...",
        Phrase::EggSoft => "Ei weich",
        Phrase::EggMedium => "Ei wachsweich",
        Phrase::EggHard => "Ei hart",
        Phrase::PastaAlDente => "Nudeln al dente",
        Phrase::PastaSoft => "Nudeln weich",
        Phrase::Rice => "Reis",
        Phrase::Potatoes => "Kartoffeln",
        Phrase::RoastAromas => "Röstaromen",
    }
}

fn en(phrase: Phrase) -> &'static str {
    match phrase {
        Phrase::Ready => "Ready",
        Phrase::Running => "Running",
        Phrase::Paused => "Paused",
        Phrase::Pause => "Pause",
        Phrase::Resume => "Resume",
        Phrase::Stop => "Stop",
        Phrase::Ok => "OK",
        Phrase::Min => "Min",
        Phrase::Sec => "Sec",
        Phrase::SelectDish => "Select dish...",
        Phrase::EggSoft => "Egg soft",
        Phrase::EggMedium => "Egg medium",
        Phrase::EggHard => "Egg hard",
        Phrase::PastaAlDente => "Pasta al dente",
        Phrase::PastaSoft => "Pasta soft",
        Phrase::Rice => "Rice",
        Phrase::Potatoes => "Potatoes",
        Phrase::RoastAromas => "Roast aromas",
    }
}

fn es(phrase: Phrase) -> &'static str {
    match phrase {
        Phrase::Ready => "Listo",
        Phrase::Running => "En marcha",
        Phrase::Paused => "Pausado",
        Phrase::Pause => "Pausa",
        Phrase::Resume => "Continuar",
        Phrase::Stop => "Parar",
        Phrase::Ok => "OK",
        Phrase::Min => "Min",
        Phrase::Sec => "Seg",
        Phrase::SelectDish => "Elegir plato...",
        Phrase::EggSoft => "Huevo pasado",
        Phrase::EggMedium => "Huevo mollet",
        Phrase::EggHard => "Huevo duro",
        Phrase::PastaAlDente => "Pasta al dente",
        Phrase::PastaSoft => "Pasta blanda",
        Phrase::Rice => "Arroz",
        Phrase::Potatoes => "Patatas",
        Phrase::RoastAromas => "Tostado",
    }
}

fn nds(phrase: Phrase) -> &'static str {
    match phrase {
        Phrase::Ready => "Kloar",
        Phrase::Running => "Löppt",
        Phrase::Paused => "Tööv man",
        Phrase::Pause => "Tööv",
        Phrase::Resume => "Wieder",
        Phrase::Stop => "Holl an",
        Phrase::Ok => "Jau",
        Phrase::Min => "Min",
        Phrase::Sec => "Sek",
        Phrase::SelectDish => "Wat schall dat ween...",
        Phrase::EggSoft => "Ei week",
        Phrase::EggMedium => "Ei middel",
        Phrase::EggHard => "Ei hart",
        Phrase::PastaAlDente => "Nudeln mit Beten",
        Phrase::PastaSoft => "Nudeln week",
        Phrase::Rice => "Ries",
        Phrase::Potatoes => "Tüffeln",
        Phrase::RoastAromas => "Bruun warm",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tag_falls_back_to_default() {
        assert_eq!(Lang::from_tag("fr"), Lang::De);
        assert_eq!(Lang::from_tag(""), Lang::De);
    }

    #[test]
    fn known_tags_resolve() {
        assert_eq!(Lang::from_tag("en"), Lang::En);
        assert_eq!(Lang::from_tag("nds"), Lang::Nds);
    }

    #[test]
    fn state_labels_localize() {
        assert_eq!(state_label(Lang::En, TimerState::Active), "Running");
        assert_eq!(state_label(Lang::De, TimerState::Idle), "Bereit");
        assert_eq!(state_label(Lang::Es, TimerState::Paused), "Pausado");
    }

    #[test]
    fn every_language_covers_every_phrase() {
        let phrases = [
            Phrase::Ready,
            Phrase::Running,
            Phrase::Paused,
            Phrase::Pause,
            Phrase::Resume,
            Phrase::Stop,
            Phrase::Ok,
            Phrase::Min,
            Phrase::Sec,
            Phrase::SelectDish,
            Phrase::EggSoft,
            Phrase::EggMedium,
            Phrase::EggHard,
            Phrase::PastaAlDente,
            Phrase::PastaSoft,
            Phrase::Rice,
            Phrase::Potatoes,
            Phrase::RoastAromas,
        ];
        for lang in [Lang::De, Lang::En, Lang::Es, Lang::Nds] {
            for phrase in phrases {
                assert!(!tr(lang, phrase).is_empty());
            }
        }
    }
}
