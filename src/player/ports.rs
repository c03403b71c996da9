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

//! Platform adapters for media control.
//!
//! Every way of reaching a player implements [`MediaControlPort`]. The
//! adapter is chosen once at startup by [`resolve_backend`] and built on the
//! control worker thread by [`create_port`], so no other code ever inspects
//! the platform.
//!
//! Three adapters are provided:
//!
//! * [`MpvPort`] - an embedded `libmpv` playlist player, the cross-platform
//!   choice when the configuration lists media files to play.
//! * [`AppleScriptPort`] - `osascript` automation of Spotify and the macOS
//!   output volume.
//! * [`PlayerctlPort`] - MPRIS control through `playerctl` on Linux
//!   desktops.

use std::process::Command;

use mpv::Format;
use thiserror::Error;

use crate::{
    config::{AppConfig, PlayerBackend},
    player::{PlayerState, PlayerStatus, VolumeDirection},
};

/// Failure at the adapter boundary. Never propagates past the control
/// worker.
#[derive(Debug, Error)]
pub(crate) enum PortError {
    #[error("failed to run control command: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("control command failed: {0}")]
    CommandFailed(String),
    #[error("malformed status reply: {0}")]
    MalformedStatus(String),
    #[error("playback engine: {0}")]
    Engine(String),
}

/// Outbound media control operations.
///
/// Implementations are built and driven on the control worker thread only;
/// they may block briefly (subprocess round-trips) without affecting the
/// frame loop.
pub(crate) trait MediaControlPort {
    fn play(&mut self) -> Result<(), PortError>;
    fn pause(&mut self) -> Result<(), PortError>;
    fn next(&mut self) -> Result<(), PortError>;
    fn previous(&mut self) -> Result<(), PortError>;

    /// Sets the absolute volume. `level` is already clamped to `0..=100` by
    /// the worker; adapters may clamp again where their target needs it.
    fn set_volume(&mut self, level: i32) -> Result<(), PortError>;

    /// Adjusts the volume by `step` points in the given direction.
    fn volume_step(&mut self, direction: VolumeDirection, step: i32) -> Result<(), PortError>;

    /// Best-effort status query.
    fn query_status(&mut self) -> Result<PlayerStatus, PortError>;
}

/// Resolves the configured backend choice to a concrete adapter.
///
/// An explicit choice in the configuration always wins. `Auto` prefers the
/// embedded player when media files are configured, then falls back to the
/// platform automation adapter.
pub(crate) fn resolve_backend(config: &AppConfig) -> PlayerBackend {
    match config.backend {
        PlayerBackend::Auto => {
            if !config.media_files.is_empty() {
                PlayerBackend::Mpv
            } else if cfg!(target_os = "macos") {
                PlayerBackend::AppleScript
            } else {
                PlayerBackend::Playerctl
            }
        }
        explicit => explicit,
    }
}

/// Builds the adapter for this run. Called on the control worker thread;
/// the embedded player's handle never leaves it.
pub(crate) fn create_port(config: &AppConfig) -> Result<Box<dyn MediaControlPort>, PortError> {
    let port: Box<dyn MediaControlPort> = match resolve_backend(config) {
        PlayerBackend::Mpv | PlayerBackend::Auto => Box::new(MpvPort::new(&config.media_files)?),
        PlayerBackend::AppleScript => Box::new(AppleScriptPort),
        PlayerBackend::Playerctl => Box::new(PlayerctlPort),
    };
    Ok(port)
}

fn engine(e: mpv::Error) -> PortError {
    PortError::Engine(format!("{e:?}"))
}

/// Embedded `libmpv` playlist player.
///
/// Property changes arrive asynchronously from the engine; the adapter
/// drains them on every status query so the snapshot reflects the latest
/// title, pause flag and volume the engine reported.
pub(crate) struct MpvPort {
    handler: mpv::MpvHandler,
    title: String,
    paused: bool,
    volume: i32,
}

impl MpvPort {
    pub(crate) fn new(files: &[String]) -> Result<Self, PortError> {
        let mut builder = mpv::MpvHandlerBuilder::new().map_err(engine)?;
        builder.set_option("vo", "null").map_err(engine)?;
        let mut handler = builder.build().map_err(engine)?;

        handler
            .observe_property::<&str>("media-title", 0)
            .map_err(engine)?;
        handler.observe_property::<bool>("pause", 0).map_err(engine)?;
        handler.observe_property::<f64>("volume", 0).map_err(engine)?;

        for (i, file) in files.iter().enumerate() {
            let mode = if i == 0 { "replace" } else { "append" };
            handler.command(&["loadfile", file, mode]).map_err(engine)?;
        }
        // Queued but not playing until the first play gesture.
        handler.set_property("pause", true).map_err(engine)?;

        Ok(Self {
            handler,
            title: String::new(),
            paused: true,
            volume: 50,
        })
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.handler.wait_event(0.0) {
            if let mpv::Event::PropertyChange { name, change, .. } = event {
                match (name, change) {
                    ("media-title", Format::Str(title)) => self.title = title.to_string(),
                    ("pause", Format::Flag(paused)) => self.paused = paused,
                    ("volume", Format::Double(volume)) => self.volume = volume.round() as i32,
                    _ => {}
                }
            }
        }
    }
}

impl MediaControlPort for MpvPort {
    fn play(&mut self) -> Result<(), PortError> {
        self.handler.set_property("pause", false).map_err(engine)
    }

    fn pause(&mut self) -> Result<(), PortError> {
        self.handler.set_property("pause", true).map_err(engine)
    }

    fn next(&mut self) -> Result<(), PortError> {
        self.handler.command(&["playlist-next"]).map_err(engine)
    }

    fn previous(&mut self) -> Result<(), PortError> {
        self.handler.command(&["playlist-prev"]).map_err(engine)
    }

    fn set_volume(&mut self, level: i32) -> Result<(), PortError> {
        self.handler
            .command(&["set", "volume", &level.to_string()])
            .map_err(engine)
    }

    fn volume_step(&mut self, direction: VolumeDirection, step: i32) -> Result<(), PortError> {
        let delta = match direction {
            VolumeDirection::Up => step,
            VolumeDirection::Down => -step,
        };
        self.handler
            .command(&["add", "volume", &delta.to_string()])
            .map_err(engine)
    }

    fn query_status(&mut self) -> Result<PlayerStatus, PortError> {
        self.drain_events();
        let track = if self.title.is_empty() {
            "Unknown Track".to_string()
        } else {
            self.title.clone()
        };
        let state = if self.paused {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        };
        Ok(PlayerStatus {
            track,
            state,
            volume: self.volume.clamp(0, 100),
        })
    }
}

/// Runs a one-shot command and returns its trimmed stdout.
fn run_command(program: &str, args: &[&str]) -> Result<String, PortError> {
    let output = Command::new(program).args(args).output()?;
    if !output.status.success() {
        return Err(PortError::CommandFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Spotify and system-volume automation via `osascript`.
pub(crate) struct AppleScriptPort;

impl AppleScriptPort {
    fn osascript(script: &str) -> Result<String, PortError> {
        run_command("osascript", &["-e", script])
    }
}

impl MediaControlPort for AppleScriptPort {
    fn play(&mut self) -> Result<(), PortError> {
        Self::osascript("tell application \"Spotify\" to play").map(|_| ())
    }

    fn pause(&mut self) -> Result<(), PortError> {
        Self::osascript("tell application \"Spotify\" to pause").map(|_| ())
    }

    fn next(&mut self) -> Result<(), PortError> {
        Self::osascript("tell application \"System Events\" to key code 19").map(|_| ())
    }

    fn previous(&mut self) -> Result<(), PortError> {
        Self::osascript("tell application \"System Events\" to key code 20").map(|_| ())
    }

    fn set_volume(&mut self, level: i32) -> Result<(), PortError> {
        Self::osascript(&format!("set volume output volume {level}")).map(|_| ())
    }

    fn volume_step(&mut self, direction: VolumeDirection, step: i32) -> Result<(), PortError> {
        let sign = match direction {
            VolumeDirection::Up => '+',
            VolumeDirection::Down => '-',
        };
        Self::osascript(&format!(
            "set volume output volume (output volume of (get volume settings) {sign} {step})"
        ))
        .map(|_| ())
    }

    fn query_status(&mut self) -> Result<PlayerStatus, PortError> {
        let reply = Self::osascript(
            "tell application \"Spotify\" to get {name of current track, \
             artist of current track, player state}",
        )?;
        let mut parts = reply.splitn(3, ", ");
        let (track, artist, state) = match (parts.next(), parts.next(), parts.next()) {
            (Some(track), Some(artist), Some(state)) => (track, artist, state),
            _ => return Err(PortError::MalformedStatus(reply.clone())),
        };

        let volume = Self::osascript("output volume of (get volume settings)")?
            .parse::<i32>()
            .map_err(|_| PortError::MalformedStatus(reply.clone()))?;

        Ok(PlayerStatus {
            track: format!("{track} - {artist}"),
            state: if state == "playing" {
                PlayerState::Playing
            } else {
                PlayerState::Paused
            },
            volume: volume.clamp(0, 100),
        })
    }
}

/// MPRIS control through `playerctl`.
pub(crate) struct PlayerctlPort;

impl PlayerctlPort {
    fn playerctl(args: &[&str]) -> Result<String, PortError> {
        run_command("playerctl", args)
    }
}

impl MediaControlPort for PlayerctlPort {
    fn play(&mut self) -> Result<(), PortError> {
        Self::playerctl(&["play"]).map(|_| ())
    }

    fn pause(&mut self) -> Result<(), PortError> {
        Self::playerctl(&["pause"]).map(|_| ())
    }

    fn next(&mut self) -> Result<(), PortError> {
        Self::playerctl(&["next"]).map(|_| ())
    }

    fn previous(&mut self) -> Result<(), PortError> {
        Self::playerctl(&["previous"]).map(|_| ())
    }

    fn set_volume(&mut self, level: i32) -> Result<(), PortError> {
        Self::playerctl(&["volume", &format!("{:.2}", f64::from(level) / 100.0)]).map(|_| ())
    }

    fn volume_step(&mut self, direction: VolumeDirection, step: i32) -> Result<(), PortError> {
        let sign = match direction {
            VolumeDirection::Up => '+',
            VolumeDirection::Down => '-',
        };
        Self::playerctl(&["volume", &format!("{:.2}{sign}", f64::from(step) / 100.0)]).map(|_| ())
    }

    fn query_status(&mut self) -> Result<PlayerStatus, PortError> {
        let state = match Self::playerctl(&["status"])?.as_str() {
            "Playing" => PlayerState::Playing,
            "Paused" => PlayerState::Paused,
            _ => PlayerState::Ready,
        };
        let track = Self::playerctl(&["metadata", "--format", "{{title}} - {{artist}}"])?;
        let volume = Self::playerctl(&["volume"])?;
        let volume = volume
            .parse::<f64>()
            .map_err(|_| PortError::MalformedStatus(volume))?;

        Ok(PlayerStatus {
            track,
            state,
            volume: ((volume * 100.0).round() as i32).clamp(0, 100),
        })
    }
}
