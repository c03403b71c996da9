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

//! Application event distribution and the per-frame pipeline.
//!
//! This module defines the central event-handling logic of the application,
//! bridging the gap between the estimator worker (hand frames), user input
//! (keyboard), the media control worker (status updates), and the UI
//! rendering pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events arrive as [`AppEvent`]s through an asynchronous
//!    channel fed by the background workers.
//! 2. **Process**: [`process_events`] runs each tracked frame through
//!    extraction, classification and dispatch, routes keyboard fallback
//!    commands, and updates the [`App`] state.
//! 3. **Render**: After each event is processed, the UI is re-drawn using
//!    the `ratatui` terminal.
//!
//! Classification itself is synchronous and cheap; anything that could block
//! (player automation, the estimator) lives behind a worker channel.

use std::{io::Stdout, time::Instant};

use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App,
    gesture::Gesture,
    hand::{TrackedHand, fingers, split_channels},
    player::{PlayerState, PlayerStatus, VolumeDirection},
    render::draw,
};

/// Ticks between best-effort status refreshes (ticks fire every 250 ms).
const STATUS_REFRESH_TICKS: u32 = 8;

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    /// All hands tracked in the latest camera frame; empty when the frame
    /// had none.
    HandsUpdated(Vec<TrackedHand>),

    PlayerStatusChanged(PlayerStatus),

    Tick,

    ExitApplication,

    Error(String),
    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI in
/// the terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            break;
        }

        match event {
            AppEvent::Key(key) => process_key_event(app, key)?,

            AppEvent::HandsUpdated(hands) => process_hand_update(app, hands, Instant::now())?,

            AppEvent::PlayerStatusChanged(status) => app.player_status = status,

            AppEvent::Tick => {
                app.ticks = app.ticks.wrapping_add(1);
                if app.ticks % STATUS_REFRESH_TICKS == 0 {
                    app.controller.refresh_status()?;
                }
            }

            AppEvent::Error(message) => app.last_error = Some(message),
            AppEvent::FatalError(message) => return Err(anyhow!(message)),

            AppEvent::ExitApplication => {}
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

/// Runs one tracked frame through the gesture pipeline.
///
/// The primary hand is extracted, classified and dispatched; the volume hand
/// (when a second hand is in frame) feeds the edge-triggered volume channel.
/// An empty frame clears the display state and dispatches nothing.
fn process_hand_update(app: &mut App, hands: Vec<TrackedHand>, now: Instant) -> Result<()> {
    let (primary, volume) = split_channels(&hands, app.config.mirrored_view);

    let mut gesture = Gesture::Unknown;
    let mut rule = None;

    if let Some(hand) = primary {
        let pose = fingers::finger_pose(&hand.landmarks);
        gesture = app.classifier.classify(&hand.landmarks, pose);
        rule = app
            .classifier
            .matched_rule(&hand.landmarks, pose)
            .map(|matched| matched.name);
        if let Some(action) = app.dispatcher.dispatch(gesture, now)? {
            app.last_action = Some(action);
        }
    }

    if let Some(hand) = volume {
        let pose = fingers::finger_pose(&hand.landmarks);
        if app
            .dispatcher
            .update_volume_hand(pose.raised_non_thumb())?
            .is_some()
        {
            app.last_action = Some("set volume");
        }
    }

    app.last_gesture = gesture;
    app.last_rule = rule;
    app.hands = hands;

    Ok(())
}

/// Maps keyboard input to application actions and playback commands.
///
/// The keyboard is a fallback control surface next to the gestures, so the
/// commands here go straight to the controller, without debouncing: a key
/// press is already a discrete event.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.event_tx.send(AppEvent::ExitApplication)?;
        }

        // Playback controls
        KeyCode::Char(' ') => match app.player_status.state {
            PlayerState::Playing => app.controller.pause()?,
            _ => app.controller.play()?,
        },
        KeyCode::Char('n') => app.controller.next()?,
        KeyCode::Char('b') => app.controller.previous()?,
        KeyCode::Char('-') => app
            .controller
            .volume_step(VolumeDirection::Down, app.config.volume_step)?,
        KeyCode::Char('=') => app
            .controller
            .volume_step(VolumeDirection::Up, app.config.volume_step)?,

        _ => {}
    }

    Ok(())
}
