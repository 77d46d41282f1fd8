#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-effort TOML preference store for session settings.
//!
//! The store holds the preferred board size, the move-path overlay flag, and
//! the best completion times. Persistence never blocks gameplay: reads fall
//! back to defaults when the file is missing or malformed, and writes swallow
//! I/O failures.

use std::fs;
use std::path::PathBuf;

use nqueens_core::BestTimes;
use serde::{Deserialize, Serialize};

const DEFAULT_BOARD_SIZE: u32 = 8;

/// On-disk schema of the preference file.
///
/// Best times are stored as an array of tables because TOML map keys must be
/// strings, while the engine keys them by numeric board size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default = "default_board_size")]
    board_size: u32,
    #[serde(default)]
    show_moves: bool,
    #[serde(default)]
    best_times: Vec<BestTimeEntry>,
}

impl Default for PreferencesFile {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            show_moves: false,
            best_times: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct BestTimeEntry {
    size: u32,
    millis: u64,
}

fn default_board_size() -> u32 {
    DEFAULT_BOARD_SIZE
}

/// Preference store backed by a single TOML file.
#[derive(Clone, Debug)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Creates a store backed by the provided file location.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Preferred board size, defaulting to 8 when unset or invalid.
    #[must_use]
    pub fn board_size(&self) -> u32 {
        let stored = self.load().board_size;
        if stored == 0 {
            DEFAULT_BOARD_SIZE
        } else {
            stored
        }
    }

    /// Persists the preferred board size.
    pub fn set_board_size(&self, size: u32) {
        let mut file = self.load();
        file.board_size = size;
        self.save(&file);
    }

    /// Whether the move-path overlay is enabled, defaulting to off.
    #[must_use]
    pub fn show_moves(&self) -> bool {
        self.load().show_moves
    }

    /// Persists the move-path overlay preference.
    pub fn set_show_moves(&self, show: bool) {
        let mut file = self.load();
        file.show_moves = show;
        self.save(&file);
    }

    /// Stored best completion times, empty when unset.
    #[must_use]
    pub fn best_times(&self) -> BestTimes {
        self.load()
            .best_times
            .into_iter()
            .map(|entry| (entry.size, entry.millis))
            .collect()
    }

    /// Persists the best completion times.
    pub fn set_best_times(&self, times: &BestTimes) {
        let mut file = self.load();
        file.best_times = times
            .iter()
            .map(|(size, millis)| BestTimeEntry { size, millis })
            .collect();
        self.save(&file);
    }

    fn load(&self) -> PreferencesFile {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return PreferencesFile::default();
        };
        toml::from_str(&contents).unwrap_or_default()
    }

    fn save(&self, file: &PreferencesFile) {
        let Ok(contents) = toml::to_string_pretty(file) else {
            return;
        };
        let _ = fs::write(&self.path, contents);
    }
}
