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

//! Media control command processing.
//!
//! This module implements the worker loop behind [`MediaController`]. It
//! receives [`MediaCommand`]s from the per-frame pipeline and the keyboard
//! fallback, executes them against the selected platform adapter, and
//! maintains the cached [`PlayerStatus`] snapshot that the UI renders.
//!
//! Adapter failures are broadcast as non-fatal [`AppEvent::Error`]s; a failed
//! status query is answered with the previous snapshot instead, so a slow or
//! absent player degrades the display rather than the pipeline.

use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};

use anyhow::Result;

use crate::{
    actions::events::AppEvent,
    config::AppConfig,
    player::{
        PlayerState, PlayerStatus, VolumeDirection,
        ports::{self, MediaControlPort},
    },
};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MediaCommand {
    Play,
    Pause,
    Next,
    Previous,
    SetVolume(i32),
    VolumeStep(VolumeDirection, i32),
    RefreshStatus,
}

/// Spawns the control worker thread to process media commands.
///
/// The adapter is built on the worker thread itself (the embedded player's
/// handle is not shareable across threads) and lives there until every
/// controller handle has been dropped. If the adapter cannot be built, the
/// failure is broadcast as a fatal application event.
///
/// # Arguments
///
/// * `config` - The application configuration naming the backend.
/// * `command_rx` - The receiving end of the command channel.
/// * `event_tx` - The channel used to broadcast status updates and errors.
pub(crate) fn spawn_player_worker(
    config: &AppConfig,
    command_rx: Receiver<MediaCommand>,
    event_tx: Sender<AppEvent>,
) {
    let config = config.clone();

    thread::spawn(move || {
        let mut port = match ports::create_port(&config) {
            Ok(port) => port,
            Err(e) => {
                let _ = event_tx.send(AppEvent::FatalError(format!("media backend: {e}")));
                return;
            }
        };
        let mut status = PlayerStatus::default();

        while let Ok(command) = command_rx.recv() {
            if let Err(e) = handle_command(port.as_mut(), &mut status, command, &event_tx) {
                let _ = event_tx.send(AppEvent::Error(format!("media control: {e}")));
            }
        }
    });
}

/// Executes a single command against the adapter and rebroadcasts the
/// resulting status snapshot.
///
/// The cached snapshot is updated optimistically for transport and volume
/// commands; the adapter is the source of truth again on the next refresh.
fn handle_command(
    port: &mut dyn MediaControlPort,
    status: &mut PlayerStatus,
    command: MediaCommand,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    match command {
        MediaCommand::Play => {
            port.play()?;
            status.state = PlayerState::Playing;
        }
        MediaCommand::Pause => {
            port.pause()?;
            status.state = PlayerState::Paused;
        }
        MediaCommand::Next => port.next()?,
        MediaCommand::Previous => port.previous()?,
        MediaCommand::SetVolume(level) => {
            let level = level.clamp(0, 100);
            port.set_volume(level)?;
            status.volume = level;
        }
        MediaCommand::VolumeStep(direction, step) => {
            port.volume_step(direction, step)?;
            status.volume = match direction {
                VolumeDirection::Up => (status.volume + step).min(100),
                VolumeDirection::Down => (status.volume - step).max(0),
            };
        }
        MediaCommand::RefreshStatus => {
            // Best-effort: a failed query answers with the cached snapshot.
            if let Ok(fresh) = port.query_status() {
                *status = fresh;
            }
        }
    }

    event_tx.send(AppEvent::PlayerStatusChanged(status.clone()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ports::PortError;
    use std::sync::mpsc;

    /// Adapter that records every call and optionally fails status queries.
    struct RecordingPort {
        calls: Vec<String>,
        status_fails: bool,
    }

    impl RecordingPort {
        fn new(status_fails: bool) -> Self {
            Self {
                calls: Vec::new(),
                status_fails,
            }
        }
    }

    impl MediaControlPort for RecordingPort {
        fn play(&mut self) -> Result<(), PortError> {
            self.calls.push("play".into());
            Ok(())
        }

        fn pause(&mut self) -> Result<(), PortError> {
            self.calls.push("pause".into());
            Ok(())
        }

        fn next(&mut self) -> Result<(), PortError> {
            self.calls.push("next".into());
            Ok(())
        }

        fn previous(&mut self) -> Result<(), PortError> {
            self.calls.push("previous".into());
            Ok(())
        }

        fn set_volume(&mut self, level: i32) -> Result<(), PortError> {
            self.calls.push(format!("set_volume {level}"));
            Ok(())
        }

        fn volume_step(&mut self, direction: VolumeDirection, step: i32) -> Result<(), PortError> {
            let sign = match direction {
                VolumeDirection::Up => '+',
                VolumeDirection::Down => '-',
            };
            self.calls.push(format!("volume_step {sign}{step}"));
            Ok(())
        }

        fn query_status(&mut self) -> Result<PlayerStatus, PortError> {
            if self.status_fails {
                Err(PortError::CommandFailed("player gone".into()))
            } else {
                Ok(PlayerStatus {
                    track: "Fresh Track".into(),
                    state: PlayerState::Playing,
                    volume: 80,
                })
            }
        }
    }

    fn run(
        port: &mut RecordingPort,
        status: &mut PlayerStatus,
        command: MediaCommand,
    ) -> PlayerStatus {
        let (event_tx, event_rx) = mpsc::channel();
        handle_command(port, status, command, &event_tx).unwrap();
        match event_rx.try_recv().unwrap() {
            AppEvent::PlayerStatusChanged(broadcast) => broadcast,
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn set_volume_clamps_to_the_valid_range() {
        let mut port = RecordingPort::new(false);
        let mut status = PlayerStatus::default();

        let broadcast = run(&mut port, &mut status, MediaCommand::SetVolume(150));
        assert_eq!(port.calls, vec!["set_volume 100"]);
        assert_eq!(broadcast.volume, 100);

        let broadcast = run(&mut port, &mut status, MediaCommand::SetVolume(-5));
        assert_eq!(port.calls.last().unwrap(), "set_volume 0");
        assert_eq!(broadcast.volume, 0);
    }

    #[test]
    fn volume_steps_move_the_cached_level() {
        let mut port = RecordingPort::new(false);
        let mut status = PlayerStatus::default();

        let broadcast = run(
            &mut port,
            &mut status,
            MediaCommand::VolumeStep(VolumeDirection::Up, 10),
        );
        assert_eq!(broadcast.volume, 60);

        for _ in 0..6 {
            run(
                &mut port,
                &mut status,
                MediaCommand::VolumeStep(VolumeDirection::Up, 10),
            );
        }
        assert_eq!(status.volume, 100);
    }

    #[test]
    fn transport_commands_update_the_cached_state() {
        let mut port = RecordingPort::new(false);
        let mut status = PlayerStatus::default();

        let broadcast = run(&mut port, &mut status, MediaCommand::Play);
        assert_eq!(broadcast.state, PlayerState::Playing);

        let broadcast = run(&mut port, &mut status, MediaCommand::Pause);
        assert_eq!(broadcast.state, PlayerState::Paused);
    }

    #[test]
    fn failed_status_query_answers_with_the_cached_snapshot() {
        let mut port = RecordingPort::new(true);
        let mut status = PlayerStatus::default();

        let broadcast = run(&mut port, &mut status, MediaCommand::RefreshStatus);
        assert_eq!(broadcast, PlayerStatus::default());
    }

    #[test]
    fn successful_status_query_replaces_the_snapshot() {
        let mut port = RecordingPort::new(false);
        let mut status = PlayerStatus::default();

        let broadcast = run(&mut port, &mut status, MediaCommand::RefreshStatus);
        assert_eq!(broadcast.track, "Fresh Track");
        assert_eq!(broadcast.state, PlayerState::Playing);
        assert_eq!(broadcast.volume, 80);
    }
}
