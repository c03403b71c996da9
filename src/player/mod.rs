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

//! Media playback control.
//!
//! This module provides the high-level [`MediaController`] interface used by
//! the gesture dispatcher and the keyboard fallback to control the target
//! player. It manages a background worker thread that drives the selected
//! [`ports::MediaControlPort`] adapter, ensuring that player automation
//! (subprocess calls, playback engine commands) never blocks the per-frame
//! pipeline: every control call is fire-and-forget.

mod commands;
pub(crate) mod ports;

use std::sync::mpsc;

use anyhow::Result;

use crate::{actions::events::AppEvent, config::AppConfig};

pub(crate) use commands::MediaCommand;

/// Playback status of the controlled player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerState {
    Ready,
    Playing,
    Paused,
}

impl PlayerState {
    pub(crate) fn label(self) -> &'static str {
        match self {
            PlayerState::Ready => "ready",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
        }
    }
}

/// Last known state of the controlled player.
///
/// Owned by the control worker and refreshed on demand; a failed refresh
/// leaves the previous snapshot in place, so consumers always see the most
/// recent answer the player gave.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlayerStatus {
    pub(crate) track: String,
    pub(crate) state: PlayerState,
    pub(crate) volume: i32,
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self {
            track: "Unknown Track".to_string(),
            state: PlayerState::Ready,
            volume: 50,
        }
    }
}

/// Direction of a relative volume adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VolumeDirection {
    Up,
    Down,
}

/// A handle to the media control worker.
///
/// This struct acts as a command proxy; it does not talk to the player
/// itself but sends instructions to a background worker thread that owns the
/// platform adapter.
#[derive(Clone)]
pub(crate) struct MediaController {
    /// Channel for sending commands to the background worker thread.
    command_tx: mpsc::Sender<MediaCommand>,
}

impl MediaController {
    /// Spawns the control worker for the configured backend and returns a
    /// new controller handle.
    ///
    /// # Arguments
    ///
    /// * `config` - The application configuration naming the backend.
    /// * `event_tx` - A channel to send application-level events (status
    ///   updates or errors) back to the main event loop.
    pub(crate) fn new(config: &AppConfig, event_tx: mpsc::Sender<AppEvent>) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<MediaCommand>();

        commands::spawn_player_worker(config, command_rx, event_tx);

        Self { command_tx }
    }

    /// Returns a controller whose commands land on the returned receiver
    /// instead of a worker, so tests can observe exactly what was fired.
    #[cfg(test)]
    pub(crate) fn detached() -> (Self, mpsc::Receiver<MediaCommand>) {
        let (command_tx, command_rx) = mpsc::channel::<MediaCommand>();
        (Self { command_tx }, command_rx)
    }

    /// Starts playback.
    pub(crate) fn play(&self) -> Result<()> {
        self.command_tx.send(MediaCommand::Play)?;
        Ok(())
    }

    /// Pauses playback.
    pub(crate) fn pause(&self) -> Result<()> {
        self.command_tx.send(MediaCommand::Pause)?;
        Ok(())
    }

    /// Skips to the next track.
    pub(crate) fn next(&self) -> Result<()> {
        self.command_tx.send(MediaCommand::Next)?;
        Ok(())
    }

    /// Returns to the previous track.
    pub(crate) fn previous(&self) -> Result<()> {
        self.command_tx.send(MediaCommand::Previous)?;
        Ok(())
    }

    /// Sets the absolute playback volume. The worker clamps to `0..=100`.
    pub(crate) fn set_volume(&self, level: i32) -> Result<()> {
        self.command_tx.send(MediaCommand::SetVolume(level))?;
        Ok(())
    }

    /// Adjusts the playback volume relative to the current level.
    ///
    /// # Arguments
    ///
    /// * `direction` - Whether to raise or lower the volume.
    /// * `step` - The size of the adjustment in volume points.
    pub(crate) fn volume_step(&self, direction: VolumeDirection, step: i32) -> Result<()> {
        self.command_tx
            .send(MediaCommand::VolumeStep(direction, step))?;
        Ok(())
    }

    /// Asks the worker for a fresh status snapshot, delivered back as an
    /// [`AppEvent::PlayerStatusChanged`]. Best-effort; on failure the worker
    /// answers with its cached snapshot.
    pub(crate) fn refresh_status(&self) -> Result<()> {
        self.command_tx.send(MediaCommand::RefreshStatus)?;
        Ok(())
    }
}
