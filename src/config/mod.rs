// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! This module manages the application configuration file.

use serde::{Deserialize, Serialize};

use crate::gesture::Vocabulary;

const CONFIG_NAME: &str = "mudra";

/// How to reach the controlled player. `Auto` picks the embedded player when
/// media files are configured, otherwise the platform automation adapter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum PlayerBackend {
    #[default]
    Auto,
    Mpv,
    AppleScript,
    Playerctl,
}

impl PlayerBackend {
    pub(crate) fn label(self) -> &'static str {
        match self {
            PlayerBackend::Auto => "auto",
            PlayerBackend::Mpv => "mpv",
            PlayerBackend::AppleScript => "applescript",
            PlayerBackend::Playerctl => "playerctl",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub version: u32,

    /// Which gesture rule table to load.
    pub(crate) vocabulary: Vocabulary,
    /// Whether the camera preview the user sees is horizontally flipped.
    /// Estimator handedness labels are mirrored when it is.
    pub mirrored_view: bool,

    /// Command line that starts the hand-pose estimator subprocess.
    pub tracker_command: Vec<String>,

    pub(crate) backend: PlayerBackend,
    /// Files for the embedded player backend, in playlist order.
    pub media_files: Vec<String>,

    /// Debounce window for play/pause and volume gestures, in milliseconds.
    pub action_cooldown_ms: u64,
    /// Debounce window for next/previous gestures, in milliseconds.
    pub track_cooldown_ms: u64,
    /// Volume points moved per thumb gesture or keyboard adjustment.
    pub volume_step: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            vocabulary: Vocabulary::default(),
            mirrored_view: true,
            tracker_command: vec!["python3".to_string(), "hand_stream.py".to_string()],
            backend: PlayerBackend::default(),
            media_files: vec![],
            action_cooldown_ms: 1_000,
            track_cooldown_ms: 2_000,
            volume_step: 10,
        }
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}
