// End-to-end card behavior without a terminal: scripted host snapshots in,
// host commands and render models out.

use chrono::{Duration, Utc};
use simmer::alert::AlertPhase;
use simmer::card::Card;
use simmer::config::CardConfig;
use simmer::demo::DemoHost;
use simmer::host::{HostCall, RecordingHost};
use simmer::runtime::{CardEvent, FixedTicker, Runner, TestEventSource};
use simmer::snapshot::{TimerSnapshot, TimerState};
use std::sync::mpsc;

fn quiet_config(entity: &str) -> CardConfig {
    CardConfig {
        entity: entity.to_string(),
        language: "en".to_string(),
        sound_enabled: false,
        ..CardConfig::default()
    }
}

fn new_card(config: CardConfig) -> Card {
    let (tx, _rx) = mpsc::channel();
    Card::new(config, tx).unwrap()
}

#[test]
fn running_timer_renders_live_countdown() {
    let mut card = new_card(CardConfig {
        presets: vec![5, 10],
        ..quiet_config("timer.x")
    });
    let host = RecordingHost::new();
    let now = Utc::now();
    host.set_snapshot(Some(TimerSnapshot {
        state: TimerState::Active,
        finishes_at: Some(now + Duration::seconds(125)),
        remaining: None,
    }));

    card.observe(&host, now);
    let view = card.view(now);
    assert_eq!(view.time_text, "02:05");
    assert_eq!(view.state_label, "Running");
    assert!(!view.alert);

    // A later look at the same snapshot counts down without a new push.
    let later = now + Duration::seconds(30);
    assert_eq!(card.view(later).time_text, "01:35");

    card.shutdown();
}

#[test]
fn full_alert_cycle_arms_sounds_and_acknowledges() {
    let mut card = new_card(quiet_config("timer.x"));
    let host = RecordingHost::new();
    let now = Utc::now();

    // Countdown crosses the threshold: armed, styled as alert.
    host.set_snapshot(Some(TimerSnapshot {
        state: TimerState::Active,
        finishes_at: Some(now + Duration::seconds(45)),
        remaining: None,
    }));
    card.observe(&host, now);
    assert_eq!(card.alert_phase(), AlertPhase::Armed);
    assert!(card.view(now).alert);

    // Host reports idle: finished, awaiting acknowledgement.
    host.set_snapshot(Some(TimerSnapshot::idle()));
    card.observe(&host, now);
    assert_eq!(card.alert_phase(), AlertPhase::Sounding);
    let view = card.view(now);
    assert!(view.finished);
    assert!(!view.alert);

    // Acknowledge is local: phase clears, no host command goes out.
    host.clear_calls();
    card.acknowledge();
    assert_eq!(card.alert_phase(), AlertPhase::Quiet);
    assert!(host.calls().is_empty());
    assert!(!card.view(now).finished);
}

#[test]
fn stop_during_countdown_never_reaches_sounding() {
    let mut card = new_card(quiet_config("timer.x"));
    let host = RecordingHost::new();
    let now = Utc::now();

    host.set_snapshot(Some(TimerSnapshot {
        state: TimerState::Active,
        finishes_at: Some(now + Duration::seconds(300)),
        remaining: None,
    }));
    card.observe(&host, now);
    card.cancel(&host);
    assert_eq!(
        host.calls().last(),
        Some(&HostCall::Cancel {
            entity: "timer.x".to_string(),
        })
    );

    host.set_snapshot(Some(TimerSnapshot::idle()));
    card.observe(&host, now);
    assert_eq!(card.alert_phase(), AlertPhase::Quiet);
    assert!(!card.view(now).finished);
}

#[test]
fn preset_and_custom_starts_reach_the_host_formatted() {
    let mut card = new_card(quiet_config("timer.x"));
    let host = RecordingHost::new();

    card.start(&host, 10 * 60, None);
    card.start(&host, 3725, None);
    card.pause(&host);
    card.resume(&host);

    assert_eq!(
        host.calls(),
        vec![
            HostCall::Start {
                entity: "timer.x".to_string(),
                duration: Some("00:10:00".to_string()),
            },
            HostCall::Start {
                entity: "timer.x".to_string(),
                duration: Some("01:02:05".to_string()),
            },
            HostCall::Pause {
                entity: "timer.x".to_string(),
            },
            HostCall::Start {
                entity: "timer.x".to_string(),
                duration: None,
            },
        ]
    );
}

#[test]
fn paused_timer_shows_frozen_remaining() {
    let mut card = new_card(quiet_config("timer.x"));
    let host = RecordingHost::new();
    let now = Utc::now();
    host.set_snapshot(Some(TimerSnapshot {
        state: TimerState::Paused,
        finishes_at: None,
        remaining: Some("02:05".to_string()),
    }));
    card.observe(&host, now);

    let view = card.view(now);
    assert_eq!(view.time_text, "02:05");
    assert_eq!(view.state_label, "Paused");
    // Frozen means frozen: later reads show the same value.
    assert_eq!(card.view(now + Duration::seconds(90)).time_text, "02:05");
    assert!(!card.is_refresh_running());
}

#[test]
fn demo_host_drives_the_card_like_a_real_backend() {
    let mut card = new_card(quiet_config("timer.demo"));
    let host = DemoHost::new("timer.demo");
    let now = Utc::now();

    card.start(&host, 10 * 60, None);
    card.observe(&host, now);
    let view = card.view(now);
    assert_eq!(view.state, TimerState::Active);
    assert!(card.is_refresh_running());

    card.pause(&host);
    card.observe(&host, now);
    assert_eq!(card.view(now).state, TimerState::Paused);
    assert!(!card.is_refresh_running());

    card.resume(&host);
    card.observe(&host, now);
    assert_eq!(card.view(now).state, TimerState::Active);

    card.cancel(&host);
    card.observe(&host, now);
    assert_eq!(card.view(now).state, TimerState::Idle);
    card.shutdown();
}

#[test]
fn runner_interleaves_refresh_ticks_with_keys() {
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(std::time::Duration::from_millis(10)),
    );

    // A card wired to the same channel pushes ticks while active.
    let mut card = Card::new(quiet_config("timer.x"), tx).unwrap();
    let host = RecordingHost::new();
    let now = Utc::now();
    host.set_snapshot(Some(TimerSnapshot {
        state: TimerState::Active,
        finishes_at: Some(now + Duration::seconds(300)),
        remaining: None,
    }));
    card.observe(&host, now);
    assert!(card.is_refresh_running());

    // The runner sees the refresh worker's ticks.
    let mut saw_tick = false;
    for _ in 0..100 {
        if matches!(runner.step(), CardEvent::Tick) {
            saw_tick = true;
            break;
        }
    }
    assert!(saw_tick);
    card.shutdown();
}

#[test]
fn entity_disappearing_mid_run_degrades_to_inline_error() {
    let mut card = new_card(quiet_config("timer.x"));
    let host = RecordingHost::new();
    let now = Utc::now();
    host.set_snapshot(Some(TimerSnapshot {
        state: TimerState::Active,
        finishes_at: Some(now + Duration::seconds(60)),
        remaining: None,
    }));
    card.observe(&host, now);
    assert!(card.is_refresh_running());

    host.set_snapshot(None);
    card.observe(&host, now);
    assert!(!card.is_refresh_running());
    assert!(card.view(now).error.is_some());

    // Entity coming back recovers without a restart.
    host.set_snapshot(Some(TimerSnapshot::idle()));
    card.observe(&host, now);
    assert!(card.view(now).error.is_none());
}
