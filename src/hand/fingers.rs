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

//! Per-digit extension state.
//!
//! Derives a five-element raised/curled vector from one hand's landmarks,
//! fresh every frame. This is the only geometry the gesture rules build on,
//! so the heuristics live here and nowhere else:
//!
//! * **Thumb** - extended iff the tip is farther from the wrist than the IP
//!   joint is. Comparing distances instead of raw x coordinates keeps the
//!   check stable when the hand rolls or the camera is rotated.
//! * **Fingers** - extended iff the tip is above the PIP joint in image
//!   coordinates *and* the tip-to-PIP distance exceeds 0.6x the MCP-to-PIP
//!   distance. The second condition rejects a slightly curled finger whose
//!   tip still happens to clear the joint.

use crate::hand::{LandmarkSet, distance, landmark};

/// Minimum tip-to-PIP reach, as a fraction of the MCP-to-PIP segment, for a
/// finger to count as extended.
const CURL_REJECT_RATIO: f32 = 0.6;

/// (MCP, PIP, TIP) index triples for the four non-thumb digits.
const FINGER_JOINTS: [(usize, usize, usize); 4] = [
    (landmark::INDEX_MCP, landmark::INDEX_PIP, landmark::INDEX_TIP),
    (landmark::MIDDLE_MCP, landmark::MIDDLE_PIP, landmark::MIDDLE_TIP),
    (landmark::RING_MCP, landmark::RING_PIP, landmark::RING_TIP),
    (landmark::PINKY_MCP, landmark::PINKY_PIP, landmark::PINKY_TIP),
];

/// Raised/curled state per digit, in thumb, index, middle, ring, pinky order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FingerPose(pub(crate) [bool; 5]);

impl FingerPose {
    /// Number of raised digits, thumb included.
    pub(crate) fn raised(self) -> usize {
        self.0.iter().filter(|&&up| up).count()
    }

    /// Number of raised digits excluding the thumb. Drives the continuous
    /// volume channel.
    pub(crate) fn raised_non_thumb(self) -> usize {
        self.0[1..].iter().filter(|&&up| up).count()
    }
}

/// Derives the extension state of all five digits.
pub(crate) fn finger_pose(hand: &LandmarkSet) -> FingerPose {
    let wrist = hand[landmark::WRIST];

    let thumb = distance(hand[landmark::THUMB_TIP], wrist)
        > distance(hand[landmark::THUMB_IP], wrist);

    let mut flags = [thumb, false, false, false, false];
    for (finger, (mcp, pip, tip)) in FINGER_JOINTS.into_iter().enumerate() {
        let vertical = hand[tip].y < hand[pip].y;
        let reach = distance(hand[pip], hand[tip])
            > CURL_REJECT_RATIO * distance(hand[mcp], hand[pip]);
        flags[finger + 1] = vertical && reach;
    }

    FingerPose(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::fixtures;

    #[test]
    fn open_hand_raises_every_digit() {
        let pose = finger_pose(&fixtures::open_hand());
        assert_eq!(pose.0, [true; 5]);
        assert_eq!(pose.raised(), 5);
        assert_eq!(pose.raised_non_thumb(), 4);
    }

    #[test]
    fn fist_raises_nothing() {
        let pose = finger_pose(&fixtures::fist());
        assert_eq!(pose.0, [false; 5]);
    }

    #[test]
    fn peace_raises_index_and_middle_only() {
        let pose = finger_pose(&fixtures::peace());
        assert_eq!(pose.0, [false, true, true, false, false]);
    }

    #[test]
    fn thumbs_up_raises_the_thumb_only() {
        let pose = finger_pose(&fixtures::thumbs_up());
        assert_eq!(pose.0, [true, false, false, false, false]);
    }

    #[test]
    fn slight_curl_fails_the_reach_check() {
        // The middle tip clears its PIP joint vertically but sits right on
        // top of it; the vertical test alone would call it extended.
        let pose = finger_pose(&fixtures::curled_middle());
        assert_eq!(pose.0, [true, true, false, true, true]);
    }

    #[test]
    fn inverted_curled_fingers_stay_curled() {
        // Upside-down hand: curled tips sit below their PIP joints, so the
        // vertical test rejects them without consulting reach.
        let pose = finger_pose(&fixtures::thumbs_down());
        assert_eq!(pose.0, [true, false, false, false, false]);
    }
}
