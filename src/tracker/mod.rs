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

//! Hand-pose estimator subprocess.
//!
//! Landmark extraction runs out of process: a configurable command (by
//! default a Python MediaPipe script) captures the camera and prints one
//! JSON object per frame on stdout:
//!
//! ```text
//! {"hands":[{"handedness":"Left","landmarks":[{"x":0.5,"y":0.9,"z":0.0}, ...]}]}
//! ```
//!
//! A worker thread owns the subprocess, parses each line and forwards the
//! tracked hands to the main event loop. Malformed frames are reported and
//! skipped; losing the subprocess entirely is fatal, since the application
//! is blind without it.

use std::{
    io::{BufRead, BufReader},
    process::{Command, Stdio},
    sync::mpsc::Sender,
    thread,
};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::{
    actions::events::AppEvent,
    config::AppConfig,
    hand::{Handedness, LANDMARK_COUNT, Landmark, LandmarkSet, TrackedHand},
};

#[derive(Deserialize)]
struct FrameMessage {
    #[serde(default)]
    hands: Vec<HandMessage>,
}

#[derive(Deserialize)]
struct HandMessage {
    handedness: Handedness,
    landmarks: Vec<Landmark>,
}

/// Spawns the estimator subprocess and the thread that reads its frames.
///
/// # Arguments
///
/// * `config` - The application configuration holding the tracker command.
/// * `event_tx` - The channel used to deliver tracked hands and errors.
pub(crate) fn spawn_tracker_worker(config: &AppConfig, event_tx: Sender<AppEvent>) {
    let command = config.tracker_command.clone();
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = tracker_worker(&command, &event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("hand tracker: {e:?}")));
        }
    });
}

/// Reads estimator output line by line until the stream ends.
fn tracker_worker(command: &[String], event_tx: &Sender<AppEvent>) -> Result<()> {
    let (program, args) = command
        .split_first()
        .context("tracker command is empty")?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start hand tracker '{program}'"))?;

    let stdout = child
        .stdout
        .take()
        .context("failed to capture tracker output")?;

    for line in BufReader::new(stdout).lines() {
        let line = line.context("failed to read tracker output")?;
        if line.is_empty() {
            continue;
        }

        match parse_frame(&line) {
            Ok(hands) => event_tx.send(AppEvent::HandsUpdated(hands))?,
            Err(e) => {
                // One bad frame is survivable, skip it.
                let _ = event_tx.send(AppEvent::Error(format!("tracker frame: {e}")));
            }
        }
    }

    Err(anyhow!("tracker stream ended"))
}

/// Parses one frame line into tracked hands.
///
/// A frame carrying a hand with the wrong landmark count is rejected whole;
/// partial hands are worse than a dropped frame.
fn parse_frame(line: &str) -> Result<Vec<TrackedHand>> {
    let message: FrameMessage = serde_json::from_str(line)?;

    let mut hands = Vec::with_capacity(message.hands.len());
    for hand in message.hands {
        let count = hand.landmarks.len();
        let landmarks: LandmarkSet = hand
            .landmarks
            .try_into()
            .map_err(|_| anyhow!("expected {LANDMARK_COUNT} landmarks, got {count}"))?;
        hands.push(TrackedHand {
            handedness: hand.handedness,
            landmarks,
        });
    }

    Ok(hands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_line(hands: usize, landmarks: usize) -> String {
        let points: Vec<String> = (0..landmarks)
            .map(|i| format!(r#"{{"x":0.5,"y":{:.3},"z":0.0}}"#, i as f32 / 100.0))
            .collect();
        let hand = format!(
            r#"{{"handedness":"Left","landmarks":[{}]}}"#,
            points.join(",")
        );
        format!(r#"{{"hands":[{}]}}"#, vec![hand; hands].join(","))
    }

    #[test]
    fn parses_a_two_hand_frame() {
        let hands = parse_frame(&frame_line(2, LANDMARK_COUNT)).unwrap();
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].handedness, Handedness::Left);
        assert!((hands[0].landmarks[3].y - 0.03).abs() < 1e-6);
    }

    #[test]
    fn empty_hand_list_is_a_valid_frame() {
        let hands = parse_frame(r#"{"hands":[]}"#).unwrap();
        assert!(hands.is_empty());

        // The hands field may be omitted entirely when nothing is tracked.
        let hands = parse_frame("{}").unwrap();
        assert!(hands.is_empty());
    }

    #[test]
    fn wrong_landmark_count_rejects_the_frame() {
        let err = parse_frame(&frame_line(1, 20)).unwrap_err();
        assert!(err.to_string().contains("expected 21 landmarks"));
    }

    #[test]
    fn depth_defaults_to_zero() {
        let line = r#"{"hands":[{"handedness":"Right","landmarks":[]}]}"#;
        // Zero landmarks is still the wrong count; this only checks the
        // field default path doesn't panic on `z`.
        assert!(parse_frame(line).is_err());

        let mut points = vec![r#"{"x":0.1,"y":0.2}"#.to_string(); LANDMARK_COUNT];
        points[0] = r#"{"x":0.0,"y":0.0}"#.to_string();
        let line = format!(
            r#"{{"hands":[{{"handedness":"Right","landmarks":[{}]}}]}}"#,
            points.join(",")
        );
        let hands = parse_frame(&line).unwrap();
        assert_eq!(hands[0].landmarks[1].z, 0.0);
    }
}
