//! The timer card itself: owns alert and selection state, reacts to host
//! snapshots, and dispatches user intents back to the host.
//!
//! The host state object is injected into `observe`/`view` rather than held
//! globally, which keeps the derivation logic pure enough to drive from
//! tests with a scripted host.

use crate::alert::{Alert, AlertPhase};
use crate::config::CardConfig;
use crate::host::{HostCommands, HostStates};
use crate::i18n::{state_label, tr, Lang, Phrase};
use crate::presets::DishPreset;
use crate::refresh::LiveRefresh;
use crate::runtime::CardEvent;
use crate::snapshot::{format_hms, format_mmss, remaining_seconds, TimerSnapshot, TimerState};
use crate::sound::{SoundSequencer, SoundSource};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::mpsc::Sender;
use tracing::{debug, info, warn};

pub struct Card {
    config: CardConfig,
    alert: Alert,
    /// Dish preset that initiated the current run, if any.
    active_dish: Option<DishPreset>,
    sound: SoundSequencer,
    refresh: LiveRefresh,
    last: Option<TimerSnapshot>,
}

impl Card {
    /// Build a card for a validated configuration. A missing entity id is
    /// rejected here, before any terminal or audio setup happens.
    pub fn new(config: CardConfig, events: Sender<CardEvent>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            alert: Alert::new(),
            active_dish: None,
            sound: SoundSequencer::new(),
            refresh: LiveRefresh::new(events),
            last: None,
        })
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Swap in an edited configuration. The entity id must stay valid;
    /// otherwise the previous configuration is kept.
    pub fn apply_config(&mut self, config: CardConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn alert_phase(&self) -> AlertPhase {
        self.alert.phase()
    }

    pub fn active_dish(&self) -> Option<&DishPreset> {
        self.active_dish.as_ref()
    }

    pub fn is_refresh_running(&self) -> bool {
        self.refresh.is_running()
    }

    pub fn is_sound_active(&self) -> bool {
        self.sound.is_active()
    }

    /// Ingest the host's current snapshot for our entity.
    ///
    /// Toggles the live refresh, advances the alert machine, and starts the
    /// sound sequence when an armed timer reaches idle. A missing entity
    /// parks the card in its inline-error state until the next push.
    pub fn observe(&mut self, host: &dyn HostStates, now: DateTime<Utc>) {
        let Some(snapshot) = host.timer(&self.config.entity) else {
            if self.last.is_some() {
                warn!(entity = %self.config.entity, "timer entity disappeared");
            }
            self.last = None;
            self.refresh.stop();
            return;
        };

        if snapshot.state == TimerState::Active {
            self.refresh.start();
        } else {
            self.refresh.stop();
        }

        let remaining = remaining_seconds(&snapshot, now);
        let begin_sounding =
            self.alert
                .observe(snapshot.state, remaining, self.config.alert_threshold_secs);
        if begin_sounding {
            if let Some(source) = SoundSource::from_config(&self.config) {
                info!(entity = %self.config.entity, "timer finished, playing alert");
                self.sound.start(
                    source,
                    self.config.clamped_volume(),
                    self.config.effective_repeats(),
                );
            }
        }

        self.last = Some(snapshot);
    }

    /// Start a new run. Any in-progress alert is silenced first, then the
    /// duration goes to the host as `HH:MM:SS`. `dish` records which preset
    /// initiated the run; plain and custom durations pass `None`.
    /// A zero duration is ignored.
    pub fn start(&mut self, host: &dyn HostCommands, seconds: u64, dish: Option<DishPreset>) {
        if seconds == 0 {
            debug!("ignoring zero-duration start");
            return;
        }
        self.silence_alert();
        self.active_dish = None;
        let duration = format_hms(seconds);
        debug!(entity = %self.config.entity, %duration, "starting timer");
        if let Err(err) = host.start(&self.config.entity, Some(&duration)) {
            warn!("start command failed: {err:#}");
        }
        self.active_dish = dish;
    }

    pub fn pause(&mut self, host: &dyn HostCommands) {
        if let Err(err) = host.pause(&self.config.entity) {
            warn!("pause command failed: {err:#}");
        }
    }

    /// Resume a paused run; on the wire this is a start without a duration.
    pub fn resume(&mut self, host: &dyn HostCommands) {
        if let Err(err) = host.start(&self.config.entity, None) {
            warn!("resume command failed: {err:#}");
        }
    }

    /// Stop the run and clear everything the run accumulated locally.
    pub fn cancel(&mut self, host: &dyn HostCommands) {
        self.silence_alert();
        self.active_dish = None;
        if let Err(err) = host.cancel(&self.config.entity) {
            warn!("cancel command failed: {err:#}");
        }
    }

    /// User acknowledged the finished timer. Local-only: the host already
    /// reports idle, so no command is issued.
    pub fn acknowledge(&mut self) {
        self.silence_alert();
        self.active_dish = None;
    }

    fn silence_alert(&mut self) {
        self.sound.stop();
        self.alert.silence();
    }

    /// Stop all background activity. Safe to call repeatedly; also runs on
    /// drop via the members' own teardown.
    pub fn shutdown(&mut self) {
        self.refresh.stop();
        self.sound.stop();
    }

    /// Derive the render model for the current instant.
    pub fn view(&self, now: DateTime<Utc>) -> CardView {
        let lang = self.config.lang();
        let Some(snapshot) = &self.last else {
            return CardView {
                error: Some(format!("Timer entity not found: {}", self.config.entity)),
                ..self.base_view(lang)
            };
        };

        let remaining = remaining_seconds(snapshot, now);
        let in_threshold = remaining <= self.config.alert_threshold_secs && remaining > 0;
        CardView {
            state: snapshot.state,
            state_label: state_label(lang, snapshot.state),
            time_text: self.format_readout(remaining, lang),
            alert: snapshot.state == TimerState::Active && in_threshold,
            finished: self.alert.is_sounding(),
            active_dish: if snapshot.state == TimerState::Active {
                self.active_dish.clone()
            } else {
                None
            },
            ..self.base_view(lang)
        }
    }

    fn base_view(&self, lang: Lang) -> CardView {
        CardView {
            title: self.config.name.clone(),
            icon: self.config.icon.clone(),
            error: None,
            state: TimerState::Idle,
            state_label: state_label(lang, TimerState::Idle),
            time_text: self.format_readout(0, lang),
            alert: false,
            finished: false,
            active_dish: None,
            pending_input: None,
            presets: self.config.presets.clone(),
            dish_presets: self.config.effective_dish_presets(),
            show_dish_presets: self.config.show_dish_presets,
            lang,
            primary: self.config.primary_rgb(),
            alert_color: self.config.alert_rgb(),
        }
    }

    fn format_readout(&self, remaining: u64, lang: Lang) -> String {
        if self.config.show_seconds {
            format_mmss(remaining)
        } else {
            format!("{} {}", remaining.div_ceil(60), tr(lang, Phrase::Min))
        }
    }
}

impl Drop for Card {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Everything the renderer needs for one frame, already localized.
#[derive(Clone, Debug)]
pub struct CardView {
    pub title: String,
    pub icon: String,
    /// Inline error (missing entity); when set, nothing else is meaningful.
    pub error: Option<String>,
    pub state: TimerState,
    pub state_label: &'static str,
    pub time_text: String,
    /// Remaining time is inside the alert threshold while running.
    pub alert: bool,
    /// An armed timer reached zero and awaits acknowledgement.
    pub finished: bool,
    pub active_dish: Option<DishPreset>,
    /// Duration digits the user is currently typing, set by the event loop.
    pub pending_input: Option<String>,
    pub presets: Vec<u64>,
    pub dish_presets: Vec<DishPreset>,
    pub show_dish_presets: bool,
    pub lang: Lang,
    pub primary: (u8, u8, u8),
    pub alert_color: (u8, u8, u8),
}
