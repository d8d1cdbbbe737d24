use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    io::{self, stdin},
    path::PathBuf,
    sync::mpsc,
    time::Duration,
};
use tracing::{info, warn};

use simmer::{
    card::Card,
    config::{CardConfig, ConfigStore, FileConfigStore},
    demo::DemoHost,
    editor::{ConfigEditor, EditorEvent},
    runtime::{CardEvent, CrosstermEventSource, FixedTicker, Runner},
    snapshot::parse_duration,
};

/// Fallback redraw interval when the live refresh is not running.
const IDLE_TICK: Duration = Duration::from_secs(1);

/// terminal kitchen timer card for home-automation timer entities
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
struct Cli {
    /// path to the card configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// timer entity id, overriding the configured one
    #[clap(short, long)]
    entity: Option<String>,

    /// language tag (de, en, es, nds), overriding the configured one
    #[clap(short, long)]
    language: Option<String>,

    /// start with sound muted regardless of configuration
    #[clap(long)]
    mute: bool,
}

/// What the key dispatcher is currently collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Typing a custom duration; digits and ':' accumulate in a buffer.
    CustomInput,
    /// Waiting for a dish hotkey letter.
    DishSelect,
}

struct App {
    card: Card,
    editor: Option<ConfigEditor>,
    mode: Mode,
    input: String,
    store: FileConfigStore,
}

enum Outcome {
    Continue,
    Quit,
}

impl App {
    fn handle_key(&mut self, host: &DemoHost, key: KeyEvent) -> Outcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Outcome::Quit;
        }

        if let Some(editor) = &mut self.editor {
            if key.code == KeyCode::Esc && !editor.is_editing() {
                self.editor = None;
                return Outcome::Continue;
            }
            if let Some(EditorEvent::ConfigChanged(config)) = editor.handle_key(key) {
                self.apply_config(config);
            }
            return Outcome::Continue;
        }

        match self.mode {
            Mode::Normal => self.handle_card_key(host, key),
            Mode::CustomInput => self.handle_input_key(host, key),
            Mode::DishSelect => self.handle_dish_key(host, key),
        }
    }

    fn handle_card_key(&mut self, host: &DemoHost, key: KeyEvent) -> Outcome {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Outcome::Quit,
            KeyCode::Char('e') => {
                self.editor = Some(ConfigEditor::new(self.card.config().clone()));
            }
            KeyCode::Char('p') => self.card.pause(host),
            KeyCode::Char('r') => self.card.resume(host),
            KeyCode::Char('s') => self.card.cancel(host),
            KeyCode::Char('c') => {
                self.mode = Mode::CustomInput;
                self.input.clear();
            }
            KeyCode::Char('d') => self.mode = Mode::DishSelect,
            KeyCode::Enter | KeyCode::Char('o') => self.card.acknowledge(),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as u8 - b'1') as usize;
                if let Some(minutes) = self.card.config().presets.get(idx).copied() {
                    self.card.start(host, minutes * 60, None);
                }
            }
            _ => {}
        }
        Outcome::Continue
    }

    fn handle_input_key(&mut self, host: &DemoHost, key: KeyEvent) -> Outcome {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.input.clear();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input);
                self.mode = Mode::Normal;
                // Bare numbers are minutes; anything with a colon is mm:ss.
                let seconds = if text.contains(':') {
                    parse_duration(&text)
                } else {
                    text.parse::<u64>().unwrap_or(0) * 60
                };
                self.card.start(host, seconds, None);
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => {
                self.input.push(c);
            }
            _ => {}
        }
        Outcome::Continue
    }

    fn handle_dish_key(&mut self, host: &DemoHost, key: KeyEvent) -> Outcome {
        self.mode = Mode::Normal;
        if let KeyCode::Char(c @ 'a'..='z') = key.code {
            let idx = (c as u8 - b'a') as usize;
            let dishes = self.card.config().effective_dish_presets();
            if let Some(dish) = dishes.get(idx) {
                self.card.start(host, dish.seconds, Some(dish.clone()));
            }
        }
        Outcome::Continue
    }

    fn apply_config(&mut self, config: CardConfig) {
        match self.card.apply_config(config) {
            Ok(()) => {
                if let Err(err) = self.store.save(self.card.config()) {
                    warn!("failed to persist configuration: {err}");
                }
            }
            Err(err) => warn!("rejected edited configuration: {err}"),
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(editor) = &self.editor {
            frame.render_widget(editor, frame.area());
            return;
        }
        let mut view = self.card.view(Utc::now());
        if self.mode == Mode::CustomInput {
            view.pending_input = Some(self.input.clone());
        }
        frame.render_widget(&view, frame.area());
    }
}

fn init_tracing(config: &CardConfig, store: &FileConfigStore) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.as_filter_str()));
    // Logs go next to the config file; stdout belongs to the terminal UI.
    let log_path = store
        .path()
        .parent()
        .map(|dir| dir.join("simmer.log"))
        .unwrap_or_else(|| PathBuf::from("simmer.log"));
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        anyhow::bail!("stdin must be a tty");
    }

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let mut config = store.load();
    if let Some(entity) = &cli.entity {
        config.entity = entity.clone();
    }
    if config.entity.is_empty() {
        // First run without a config file: wire up the bundled demo timer.
        config.entity = "timer.demo".to_string();
    }
    if let Some(language) = &cli.language {
        config.language = language.clone();
    }
    if cli.mute {
        config.sound_enabled = false;
    }
    config.validate()?;

    init_tracing(&config, &store)?;
    info!(entity = %config.entity, "starting timer card");

    let host = DemoHost::new(config.entity.clone());

    let (tx, rx) = mpsc::channel();
    let events = CrosstermEventSource::spawn(tx.clone(), rx);
    let card = Card::new(config, tx)?;
    let mut app = App {
        card,
        editor: None,
        mode: Mode::Normal,
        input: String::new(),
        store,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &host, events);

    app.card.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    host: &DemoHost,
    events: CrosstermEventSource,
) -> Result<()> {
    let runner = Runner::new(events, FixedTicker::new(IDLE_TICK));
    loop {
        app.card.observe(host, Utc::now());
        terminal.draw(|frame| app.draw(frame))?;

        match runner.step() {
            CardEvent::Key(key) => {
                if let Outcome::Quit = app.handle_key(host, key) {
                    return Ok(());
                }
            }
            CardEvent::Tick | CardEvent::Resize => {}
        }
    }
}
