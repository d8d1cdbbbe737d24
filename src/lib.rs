// Library surface for headless/integration tests and reuse.
// The binary in main.rs owns the terminal lifecycle and key dispatch.
pub mod alert;
pub mod cancel;
pub mod card;
pub mod config;
pub mod demo;
pub mod editor;
pub mod host;
pub mod i18n;
pub mod presets;
pub mod refresh;
pub mod runtime;
pub mod snapshot;
pub mod sound;
pub mod ui;
