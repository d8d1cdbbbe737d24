//! Audible alert playback: repeat sequencing, cancellation, and the
//! built-in bell-like chime.
//!
//! Playback runs on its own thread because audio output handles are not
//! `Send`; the card talks to it only through a [`CancelToken`]. Failures
//! anywhere in the audio path are logged and swallowed — they must never
//! disturb the visual alert state.

use crate::cancel::CancelToken;
use crate::config::CardConfig;
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rodio::{buffer::SamplesBuffer, Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Pause between repeats of an external or inline source.
const REPEAT_GAP: Duration = Duration::from_millis(500);
/// Fixed cadence between chime strikes, long enough for the decay to ring out.
const CHIME_CADENCE: Duration = Duration::from_millis(2800);
/// How long one chime strike rings.
const CHIME_RING_SECS: f32 = 2.5;
const CHIME_SAMPLE_RATE: u32 = 44_100;
/// Granularity of cancellation checks while waiting out a cadence.
const WAIT_SLICE: Duration = Duration::from_millis(25);

/// Five simultaneous overtones voicing a C-major bell: frequency, relative
/// gain, and decay seconds. C4 fundamental, E4/G4/C5 chord body, G5 shimmer.
const CHIME_OVERTONES: [(f32, f32, f32); 5] = [
    (261.63, 0.35, 2.5),
    (329.63, 0.25, 2.0),
    (392.00, 0.20, 1.8),
    (523.25, 0.15, 1.5),
    (783.99, 0.08, 1.2),
];

/// Where the audible cue comes from, in priority order.
#[derive(Clone, Debug, PartialEq)]
pub enum SoundSource {
    /// External sound file reference.
    File(PathBuf),
    /// Decoded inline payload from the configuration.
    Inline(Vec<u8>),
    /// The generated chime.
    Chime,
}

impl SoundSource {
    /// Resolve the configured source. `None` means sound is disabled; a
    /// broken inline payload degrades to the chime rather than to silence.
    pub fn from_config(config: &CardConfig) -> Option<Self> {
        if !config.sound_enabled {
            return None;
        }
        if let Some(path) = &config.sound_file {
            return Some(SoundSource::File(path.clone()));
        }
        if let Some(data) = &config.sound_data {
            match decode_inline(data) {
                Ok(bytes) => return Some(SoundSource::Inline(bytes)),
                Err(err) => warn!("ignoring inline sound payload: {err:#}"),
            }
        }
        Some(SoundSource::Chime)
    }
}

/// Accept both raw base64 and `data:audio/...;base64,...` payloads.
fn decode_inline(data: &str) -> Result<Vec<u8>> {
    let trimmed = data.trim();
    let payload = trimmed
        .split_once("base64,")
        .map(|(_, tail)| tail)
        .unwrap_or(trimmed);
    STANDARD
        .decode(payload.as_bytes())
        .context("decoding inline sound payload")
}

/// One playable cue. `strike` plays the cue once and reports how long to
/// wait before the next repeat; `silence` cuts any active output.
trait CuePlayer {
    fn strike(&mut self, volume: f32) -> Result<Duration>;
    fn silence(&mut self);
}

/// Drive the repeat loop: play up to `repeats` strikes, waiting out each
/// cadence in small slices so cancellation lands promptly. Returns the
/// number of strikes attempted.
fn run_sequence<P: CuePlayer>(
    player: &mut P,
    volume: f32,
    repeats: u32,
    token: &CancelToken,
) -> u32 {
    let mut attempts = 0;
    for _ in 0..repeats {
        if token.is_cancelled() {
            break;
        }
        attempts += 1;
        match player.strike(volume) {
            Ok(cadence) => {
                if !wait_unless_cancelled(cadence, token) {
                    break;
                }
            }
            Err(err) => {
                warn!("sound playback failed: {err:#}");
                break;
            }
        }
    }
    player.silence();
    attempts
}

/// Sleep for `duration`, checking the token between slices. Returns `false`
/// if cancellation interrupted the wait.
fn wait_unless_cancelled(duration: Duration, token: &CancelToken) -> bool {
    let mut remaining = duration;
    while remaining > Duration::ZERO {
        if token.is_cancelled() {
            return false;
        }
        let slice = remaining.min(WAIT_SLICE);
        thread::sleep(slice);
        remaining = remaining.saturating_sub(slice);
    }
    !token.is_cancelled()
}

/// Source material prepared up front so the playback thread owns plain data.
enum PreparedCue {
    Encoded(Vec<u8>),
    Samples(Vec<f32>),
}

impl PreparedCue {
    fn prepare(source: SoundSource) -> Result<Self> {
        match source {
            SoundSource::File(path) => {
                let bytes = fs::read(&path)
                    .with_context(|| format!("reading sound file {}", path.display()))?;
                Ok(PreparedCue::Encoded(bytes))
            }
            SoundSource::Inline(bytes) => Ok(PreparedCue::Encoded(bytes)),
            SoundSource::Chime => Ok(PreparedCue::Samples(synthesize_chime())),
        }
    }
}

/// rodio-backed player; the output stream is opened lazily on the first
/// strike so a missing audio device surfaces as a logged playback failure.
struct RodioCue {
    cue: PreparedCue,
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
}

impl RodioCue {
    fn new(cue: PreparedCue) -> Self {
        Self {
            cue,
            output: None,
            sink: None,
        }
    }

    fn ensure_sink(&mut self) -> Result<&Sink> {
        if self.output.is_none() {
            let (stream, handle) = OutputStream::try_default().context("opening audio output")?;
            let sink = Sink::try_new(&handle).context("creating audio sink")?;
            self.output = Some((stream, handle));
            self.sink = Some(sink);
        }
        Ok(self.sink.as_ref().unwrap())
    }
}

impl CuePlayer for RodioCue {
    fn strike(&mut self, volume: f32) -> Result<Duration> {
        // Decode outside the sink borrow; each strike replays from scratch.
        let (source, cadence): (Box<dyn Source<Item = f32> + Send>, Duration) = match &self.cue {
            PreparedCue::Encoded(bytes) => {
                let decoded = Decoder::new(Cursor::new(bytes.clone()))
                    .context("decoding sound source")?;
                let ring = decoded.total_duration().unwrap_or(Duration::from_secs(1));
                (Box::new(decoded.convert_samples()), ring + REPEAT_GAP)
            }
            PreparedCue::Samples(samples) => (
                Box::new(SamplesBuffer::new(1, CHIME_SAMPLE_RATE, samples.clone())),
                CHIME_CADENCE,
            ),
        };
        let sink = self.ensure_sink()?;
        sink.set_volume(volume);
        sink.append(source);
        Ok(cadence)
    }

    fn silence(&mut self) {
        if let Some(sink) = &self.sink {
            sink.stop();
        }
    }
}

/// Render the chime into a mono sample buffer: 10 ms linear attack per
/// overtone, then an exponential decay to near-silence over each overtone's
/// own decay time.
fn synthesize_chime() -> Vec<f32> {
    const ATTACK: f32 = 0.01;
    const FLOOR: f32 = 0.001;
    let total = (CHIME_RING_SECS * CHIME_SAMPLE_RATE as f32) as usize;
    let mut samples = Vec::with_capacity(total);
    for i in 0..total {
        let t = i as f32 / CHIME_SAMPLE_RATE as f32;
        let mut mixed = 0.0f32;
        for (freq, gain, decay) in CHIME_OVERTONES {
            let amplitude = if t < ATTACK {
                gain * (t / ATTACK)
            } else if t >= decay {
                0.0
            } else {
                let frac = (t - ATTACK) / (decay - ATTACK);
                gain * (FLOOR / gain).powf(frac)
            };
            mixed += amplitude * (std::f32::consts::TAU * freq * t).sin();
        }
        samples.push(mixed.clamp(-1.0, 1.0));
    }
    samples
}

/// Handle to the (at most one) in-flight alert sequence.
///
/// `start` replaces any running sequence; `stop` is idempotent, synchronous,
/// and safe after the sequence already finished on its own.
#[derive(Default)]
pub struct SoundSequencer {
    token: Option<CancelToken>,
    worker: Option<JoinHandle<()>>,
}

impl SoundSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, source: SoundSource, volume: f32, repeats: u32) {
        self.stop();
        let token = CancelToken::new();
        let thread_token = token.clone();
        let volume = volume.clamp(0.0, 1.0);
        let repeats = repeats.max(1);
        let spawned = thread::Builder::new()
            .name("simmer-sound".to_string())
            .spawn(move || {
                let cue = match PreparedCue::prepare(source) {
                    Ok(cue) => cue,
                    Err(err) => {
                        warn!("sound sequence not started: {err:#}");
                        return;
                    }
                };
                let mut player = RodioCue::new(cue);
                let attempts = run_sequence(&mut player, volume, repeats, &thread_token);
                debug!(attempts, repeats, "sound sequence done");
            });
        match spawned {
            Ok(worker) => {
                self.token = Some(token);
                self.worker = Some(worker);
            }
            Err(err) => warn!("failed to spawn sound thread: {err}"),
        }
    }

    /// Abort the sequence: silences active output and prevents further
    /// repeats. A no-op when nothing is playing.
    pub fn stop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    pub fn is_active(&self) -> bool {
        self.worker
            .as_ref()
            .map(|worker| !worker.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SoundSequencer {
    fn drop(&mut self) {
        self.stop();
    }
}
