// Editor-to-store flow: every committed edit carries the complete
// configuration and survives a save/load cycle.

use crossterm::event::{KeyCode, KeyEvent};
use simmer::config::{CardConfig, ConfigStore, FileConfigStore};
use simmer::editor::{ConfigEditor, EditorEvent, Field};
use tempfile::tempdir;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::from(code)
}

fn select(editor: &mut ConfigEditor, field: Field) {
    while editor.selected() != field {
        editor.handle_key(key(KeyCode::Down));
    }
}

fn replace_buffer(editor: &mut ConfigEditor, text: &str) {
    editor.handle_key(key(KeyCode::Enter));
    // Clear whatever the buffer was seeded with.
    for _ in 0..64 {
        editor.handle_key(key(KeyCode::Backspace));
    }
    for c in text.chars() {
        editor.handle_key(key(KeyCode::Char(c)));
    }
}

#[test]
fn edits_round_trip_through_the_store() {
    let dir = tempdir().unwrap();
    let store = FileConfigStore::with_path(dir.path().join("card.json"));

    let mut editor = ConfigEditor::new(CardConfig {
        entity: "timer.kitchen".to_string(),
        ..CardConfig::default()
    });

    select(&mut editor, Field::Presets);
    replace_buffer(&mut editor, "3,7,12");
    let EditorEvent::ConfigChanged(cfg) = editor.handle_key(key(KeyCode::Enter)).unwrap();
    assert_eq!(cfg.presets, vec![3, 7, 12]);

    select(&mut editor, Field::AlertThreshold);
    replace_buffer(&mut editor, "90");
    let EditorEvent::ConfigChanged(cfg) = editor.handle_key(key(KeyCode::Enter)).unwrap();
    assert_eq!(cfg.alert_threshold_secs, 90);
    // The event carries the whole config, including the earlier edit.
    assert_eq!(cfg.presets, vec![3, 7, 12]);

    store.save(&cfg).unwrap();
    let loaded = store.load();
    assert_eq!(loaded, cfg);
    assert_eq!(loaded.entity, "timer.kitchen");
    loaded.validate().unwrap();
}

#[test]
fn dish_edits_extend_the_builtin_table_and_persist() {
    let dir = tempdir().unwrap();
    let store = FileConfigStore::with_path(dir.path().join("card.json"));

    let mut editor = ConfigEditor::new(CardConfig {
        entity: "timer.kitchen".to_string(),
        ..CardConfig::default()
    });
    select(&mut editor, Field::DishPresets);
    editor.handle_key(key(KeyCode::Enter));
    for c in "🥟,Dumplings,08:30".chars() {
        editor.handle_key(key(KeyCode::Char(c)));
    }
    let EditorEvent::ConfigChanged(cfg) = editor.handle_key(key(KeyCode::Enter)).unwrap();

    store.save(&cfg).unwrap();
    let loaded = store.load();
    let dishes = loaded.dish_presets.unwrap();
    assert_eq!(dishes.len(), 9);
    assert_eq!(dishes.last().unwrap().name, "Dumplings");
    assert_eq!(dishes.last().unwrap().seconds, 510);
}

#[test]
fn emptying_the_entity_produces_an_invalid_config() {
    let mut editor = ConfigEditor::new(CardConfig {
        entity: "timer.kitchen".to_string(),
        ..CardConfig::default()
    });
    select(&mut editor, Field::Entity);
    replace_buffer(&mut editor, "");
    let EditorEvent::ConfigChanged(cfg) = editor.handle_key(key(KeyCode::Enter)).unwrap();
    // The editor emits it; the card is the one that refuses to apply it.
    assert!(cfg.validate().is_err());
}
