// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod catalog;
pub mod game;
pub mod language;
pub mod ranking;
pub mod runtime;
pub mod scramble;
pub mod settings;
