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

//! Debounced action dispatch.
//!
//! A recognized gesture held in front of the camera is re-recognized on
//! every frame; the dispatcher turns that stream into at most one outbound
//! command per cooldown window. Two windows run independently so that rapid
//! play/pause toggling cannot starve track navigation and vice versa:
//!
//! * the **generic** domain (default 1 s) gates play, pause and the volume
//!   steps;
//! * the **track-change** domain (default 2 s) gates next/previous.
//!
//! A gesture arriving while its domain is cooling is silently discarded:
//! that is the debounce working, not a failure.
//!
//! The continuous volume channel from the second hand bypasses both windows;
//! it is edge-triggered instead, forwarding a level only when it differs
//! from the last one forwarded.
//!
//! Every entry point takes the current [`Instant`] from the caller, so tests
//! drive the clock explicitly.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::{
    config::AppConfig,
    gesture::Gesture,
    player::{MediaController, VolumeDirection},
};

/// Volume points per raised finger on the volume hand.
const VOLUME_FINGER_STEP: i32 = 25;

/// Maps a raised-finger count on the volume hand to an absolute level.
pub(crate) fn volume_level(raised_non_thumb: usize) -> i32 {
    (raised_non_thumb as i32 * VOLUME_FINGER_STEP).min(100)
}

/// One cooldown domain: a window and the time of the last fired action.
///
/// There is no timer event; expiry is checked lazily on the next attempt.
#[derive(Debug)]
struct Cooldown {
    window: Duration,
    last_fired: Option<Instant>,
}

impl Cooldown {
    fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
        }
    }

    fn ready(&self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) => now.duration_since(last) >= self.window,
            None => true,
        }
    }

    fn stamp(&mut self, now: Instant) {
        self.last_fired = Some(now);
    }
}

/// Turns recognized gestures into debounced media commands.
///
/// Owns the process-lifetime dispatch state: both cooldown domains, the
/// cached volume the step gestures move, and the last level forwarded on the
/// continuous channel. The cache is updated synchronously while the command
/// itself is fire-and-forget, so the next frame sees consistent state no
/// matter how slow the player is.
pub(crate) struct GestureDispatcher {
    controller: MediaController,
    action_cooldown: Cooldown,
    track_cooldown: Cooldown,
    volume_step: i32,
    volume: i32,
    forwarded_level: Option<i32>,
}

impl GestureDispatcher {
    pub(crate) fn new(controller: MediaController, config: &AppConfig) -> Self {
        Self {
            controller,
            action_cooldown: Cooldown::new(Duration::from_millis(config.action_cooldown_ms)),
            track_cooldown: Cooldown::new(Duration::from_millis(config.track_cooldown_ms)),
            volume_step: config.volume_step,
            volume: 50,
            forwarded_level: None,
        }
    }

    /// Dispatches one recognized gesture.
    ///
    /// Returns the label of the action that fired, or `None` when the
    /// gesture maps to nothing or its domain is still cooling.
    pub(crate) fn dispatch(&mut self, gesture: Gesture, now: Instant) -> Result<Option<&'static str>> {
        let fired = match gesture {
            Gesture::OpenPalm => {
                if !self.action_cooldown.ready(now) {
                    return Ok(None);
                }
                self.controller.play()?;
                self.action_cooldown.stamp(now);
                "play"
            }
            Gesture::Fist => {
                if !self.action_cooldown.ready(now) {
                    return Ok(None);
                }
                self.controller.pause()?;
                self.action_cooldown.stamp(now);
                "pause"
            }
            Gesture::ThumbsUp => {
                if !self.action_cooldown.ready(now) {
                    return Ok(None);
                }
                self.volume = (self.volume + self.volume_step).min(100);
                self.controller
                    .volume_step(VolumeDirection::Up, self.volume_step)?;
                self.action_cooldown.stamp(now);
                "volume up"
            }
            Gesture::ThumbsDown => {
                if !self.action_cooldown.ready(now) {
                    return Ok(None);
                }
                self.volume = (self.volume - self.volume_step).max(0);
                self.controller
                    .volume_step(VolumeDirection::Down, self.volume_step)?;
                self.action_cooldown.stamp(now);
                "volume down"
            }
            Gesture::Peace => {
                if !self.track_cooldown.ready(now) {
                    return Ok(None);
                }
                self.controller.next()?;
                self.track_cooldown.stamp(now);
                "next track"
            }
            Gesture::LShape | Gesture::PointUp => {
                if !self.track_cooldown.ready(now) {
                    return Ok(None);
                }
                self.controller.previous()?;
                self.track_cooldown.stamp(now);
                "previous track"
            }
            Gesture::Unknown => return Ok(None),
        };

        Ok(Some(fired))
    }

    /// Feeds the continuous volume channel with the raised-finger count of
    /// the volume hand.
    ///
    /// Forwards a set-volume command only when the computed level differs
    /// from the last forwarded one; a hand held still issues nothing.
    pub(crate) fn update_volume_hand(&mut self, raised_non_thumb: usize) -> Result<Option<i32>> {
        let level = volume_level(raised_non_thumb);
        if self.forwarded_level == Some(level) {
            return Ok(None);
        }

        self.controller.set_volume(level)?;
        self.forwarded_level = Some(level);
        self.volume = level;

        Ok(Some(level))
    }

    /// The dispatcher's cached volume.
    #[cfg(test)]
    pub(crate) fn volume(&self) -> i32 {
        self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::MediaCommand;
    use std::sync::mpsc::Receiver;

    fn dispatcher() -> (GestureDispatcher, Receiver<MediaCommand>) {
        let (controller, command_rx) = MediaController::detached();
        let dispatcher = GestureDispatcher::new(controller, &AppConfig::default());
        (dispatcher, command_rx)
    }

    fn after(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn cooldown_expires_lazily() {
        let mut cooldown = Cooldown::new(Duration::from_secs(1));
        let t0 = Instant::now();

        assert!(cooldown.ready(t0));
        cooldown.stamp(t0);
        assert!(!cooldown.ready(after(t0, 999)));
        assert!(cooldown.ready(after(t0, 1000)));
    }

    #[test]
    fn held_gesture_fires_at_most_once_per_window() {
        let (mut dispatcher, command_rx) = dispatcher();
        let t0 = Instant::now();

        assert_eq!(
            dispatcher.dispatch(Gesture::Peace, t0).unwrap(),
            Some("next track")
        );
        assert_eq!(dispatcher.dispatch(Gesture::Peace, after(t0, 500)).unwrap(), None);
        assert_eq!(dispatcher.dispatch(Gesture::Peace, after(t0, 1900)).unwrap(), None);
        assert_eq!(
            dispatcher.dispatch(Gesture::Peace, after(t0, 2100)).unwrap(),
            Some("next track")
        );

        let fired: Vec<MediaCommand> = command_rx.try_iter().collect();
        assert_eq!(fired, vec![MediaCommand::Next, MediaCommand::Next]);
    }

    #[test]
    fn domains_cool_independently() {
        let (mut dispatcher, command_rx) = dispatcher();
        let t0 = Instant::now();

        // A track change does not consume the generic window...
        assert_eq!(
            dispatcher.dispatch(Gesture::Peace, t0).unwrap(),
            Some("next track")
        );
        assert_eq!(
            dispatcher.dispatch(Gesture::OpenPalm, t0).unwrap(),
            Some("play")
        );

        // ...and a cooling generic window does not block track changes.
        assert_eq!(dispatcher.dispatch(Gesture::Fist, after(t0, 500)).unwrap(), None);
        assert_eq!(
            dispatcher.dispatch(Gesture::Fist, after(t0, 1100)).unwrap(),
            Some("pause")
        );

        let fired: Vec<MediaCommand> = command_rx.try_iter().collect();
        assert_eq!(
            fired,
            vec![MediaCommand::Next, MediaCommand::Play, MediaCommand::Pause]
        );
    }

    #[test]
    fn unknown_gesture_is_a_no_op() {
        let (mut dispatcher, command_rx) = dispatcher();
        let t0 = Instant::now();

        assert_eq!(dispatcher.dispatch(Gesture::Unknown, t0).unwrap(), None);
        assert!(command_rx.try_iter().next().is_none());

        // The no-op must not have started a cooldown.
        assert_eq!(
            dispatcher.dispatch(Gesture::OpenPalm, t0).unwrap(),
            Some("play")
        );
    }

    #[test]
    fn volume_steps_clamp_the_cached_level() {
        let (mut dispatcher, command_rx) = dispatcher();
        let t0 = Instant::now();

        for i in 0..7 {
            dispatcher
                .dispatch(Gesture::ThumbsUp, after(t0, i * 1100))
                .unwrap();
        }
        assert_eq!(dispatcher.volume(), 100);

        let steps = command_rx.try_iter().count();
        assert_eq!(steps, 7);
    }

    #[test]
    fn volume_channel_is_edge_triggered() {
        let (mut dispatcher, command_rx) = dispatcher();

        assert_eq!(dispatcher.update_volume_hand(4).unwrap(), Some(100));
        assert_eq!(dispatcher.update_volume_hand(4).unwrap(), None);
        assert_eq!(dispatcher.update_volume_hand(4).unwrap(), None);
        assert_eq!(dispatcher.update_volume_hand(2).unwrap(), Some(50));
        assert_eq!(dispatcher.update_volume_hand(0).unwrap(), Some(0));

        let fired: Vec<MediaCommand> = command_rx.try_iter().collect();
        assert_eq!(
            fired,
            vec![
                MediaCommand::SetVolume(100),
                MediaCommand::SetVolume(50),
                MediaCommand::SetVolume(0),
            ]
        );
    }

    #[test]
    fn volume_channel_ignores_cooldowns() {
        let (mut dispatcher, _command_rx) = dispatcher();
        let t0 = Instant::now();

        // Exhaust the generic window, then change the volume level twice in
        // the same instant: both changes go through.
        dispatcher.dispatch(Gesture::ThumbsUp, t0).unwrap();
        assert_eq!(dispatcher.update_volume_hand(1).unwrap(), Some(25));
        assert_eq!(dispatcher.update_volume_hand(3).unwrap(), Some(75));
    }

    #[test]
    fn finger_counts_map_to_quarter_levels() {
        assert_eq!(volume_level(0), 0);
        assert_eq!(volume_level(1), 25);
        assert_eq!(volume_level(2), 50);
        assert_eq!(volume_level(3), 75);
        assert_eq!(volume_level(4), 100);
    }
}
