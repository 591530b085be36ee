use crate::language::Language;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Points awarded per correctly guessed word.
pub const SCORE_INCREASE: u32 = 20;

/// Player preferences persisted between runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub language: Language,
    pub word_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::English,
            word_count: Difficulty::Easy.word_count(),
        }
    }
}

/// Difficulty presets mapping to the number of words per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum_macros::Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn word_count(&self) -> usize {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 15,
        }
    }

    pub fn from_word_count(count: usize) -> Option<Self> {
        match count {
            5 => Some(Difficulty::Easy),
            10 => Some(Difficulty::Medium),
            15 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}

pub trait SettingsStore {
    /// Read the persisted settings. An `Err` means the store could not be
    /// read; callers degrade to `Settings::default()` and keep playing.
    fn load(&self) -> io::Result<Settings>;
    fn save(&self, settings: &Settings) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "unscramble") {
            pd.config_dir().join("settings.json")
        } else {
            PathBuf::from("unscramble_settings.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> io::Result<Settings> {
        // A missing file is not an access error, just first run.
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let bytes = fs::read(&self.path)?;
        serde_json::from_slice::<Settings>(&bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(settings).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
