// Full-frame render checks through ratatui's TestBackend, the same way a
// real terminal session would draw the card.

use chrono::{Duration, Utc};
use ratatui::{backend::TestBackend, Terminal};
use simmer::card::Card;
use simmer::config::CardConfig;
use simmer::editor::ConfigEditor;
use simmer::host::RecordingHost;
use simmer::snapshot::{TimerSnapshot, TimerState};
use std::sync::mpsc;

fn draw_card(card: &Card) -> String {
    let backend = TestBackend::new(80, 30);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| frame.render_widget(&card.view(Utc::now()), frame.area()))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|c| c.symbol())
        .collect()
}

fn card_with_snapshot(language: &str, snapshot: TimerSnapshot) -> Card {
    let config = CardConfig {
        entity: "timer.kitchen".to_string(),
        language: language.to_string(),
        sound_enabled: false,
        ..CardConfig::default()
    };
    let (tx, _rx) = mpsc::channel();
    let mut card = Card::new(config, tx).unwrap();
    let host = RecordingHost::new();
    host.set_snapshot(Some(snapshot));
    card.observe(&host, Utc::now());
    card
}

#[test]
fn active_frame_shows_countdown_presets_and_dishes() {
    let now = Utc::now();
    let mut card = card_with_snapshot(
        "en",
        TimerSnapshot {
            state: TimerState::Active,
            finishes_at: Some(now + Duration::seconds(125)),
            remaining: None,
        },
    );
    let frame = draw_card(&card);
    assert!(frame.contains("Kitchen Timer"));
    assert!(frame.contains("02:0")); // 02:05 or 02:04 depending on the draw instant
    assert!(frame.contains("Running"));
    assert!(frame.contains("(1) 5 Min"));
    assert!(frame.contains("Select dish..."));
    assert!(frame.contains("Egg soft"));
    card.shutdown();
}

#[test]
fn idle_frame_localizes_to_german_by_default() {
    let mut card = card_with_snapshot("de", TimerSnapshot::idle());
    let frame = draw_card(&card);
    assert!(frame.contains("Bereit"));
    assert!(frame.contains("Gericht wählen..."));
    card.shutdown();
}

#[test]
fn editor_frame_lists_every_field() {
    let editor = ConfigEditor::new(CardConfig {
        entity: "timer.kitchen".to_string(),
        ..CardConfig::default()
    });
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| frame.render_widget(&editor, frame.area()))
        .unwrap();
    let frame: String = terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|c| c.symbol())
        .collect();
    for label in [
        "Timer entity",
        "Language",
        "Minute presets",
        "Alert threshold",
        "Volume",
        "Primary color",
    ] {
        assert!(frame.contains(label), "missing field label {label}");
    }
}
