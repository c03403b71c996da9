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

//! The two built-in gesture vocabularies.
//!
//! Both are configurations of the same rule engine. The fine table guards
//! each shape with position and spread checks on top of the raised-digit
//! pattern; the coarse table keeps the loose count-only predicates of the
//! legacy four-gesture vocabulary.

use crate::gesture::{Gesture, GestureRule};
use crate::hand::fingers::FingerPose;
use crate::hand::{LandmarkSet, distance, landmark};

/// Minimum index/middle tip separation for a peace sign, as a fraction of
/// the index PIP-to-tip segment.
const PEACE_GAP_RATIO: f32 = 0.3;

/// The six-gesture vocabulary, in precedence order.
///
/// Thumb gestures come first: their raised-digit pattern is a strict subset
/// of what a loose fist check would accept, so they must win before the fist
/// rule runs.
pub(crate) fn fine_rules() -> Vec<GestureRule> {
    vec![
        GestureRule::new("thumbs-up", Gesture::ThumbsUp, thumbs_up),
        GestureRule::new("thumbs-down", Gesture::ThumbsDown, thumbs_down),
        GestureRule::new("peace-sign", Gesture::Peace, peace),
        GestureRule::new("fist", Gesture::Fist, fist),
        GestureRule::new("open-palm", Gesture::OpenPalm, open_palm),
        GestureRule::new("one-finger", Gesture::PointUp, point_up),
    ]
}

/// The legacy four-gesture vocabulary, in its historical precedence order.
pub(crate) fn coarse_rules() -> Vec<GestureRule> {
    vec![
        GestureRule::new("fist", Gesture::Fist, loose_fist),
        GestureRule::new("l-shape", Gesture::LShape, l_shape),
        GestureRule::new("peace-sign", Gesture::Peace, loose_peace),
        GestureRule::new("open-palm", Gesture::OpenPalm, loose_open_palm),
    ]
}

fn thumbs_up(hand: &LandmarkSet, pose: FingerPose) -> bool {
    matches!(pose.0, [true, false, false, false, false])
        && hand[landmark::THUMB_TIP].y < hand[landmark::INDEX_MCP].y
}

fn thumbs_down(hand: &LandmarkSet, pose: FingerPose) -> bool {
    matches!(pose.0, [true, false, false, false, false])
        && hand[landmark::THUMB_TIP].y > hand[landmark::INDEX_MCP].y
}

fn peace(hand: &LandmarkSet, pose: FingerPose) -> bool {
    let spread = distance(hand[landmark::INDEX_TIP], hand[landmark::MIDDLE_TIP])
        > PEACE_GAP_RATIO * distance(hand[landmark::INDEX_PIP], hand[landmark::INDEX_TIP]);
    matches!(pose.0, [_, true, true, false, false])
        && spread
        && hand[landmark::INDEX_TIP].y < hand[landmark::RING_PIP].y
}

fn fist(hand: &LandmarkSet, pose: FingerPose) -> bool {
    let knuckles = [
        landmark::INDEX_MCP,
        landmark::MIDDLE_MCP,
        landmark::RING_MCP,
        landmark::PINKY_MCP,
    ];
    let knuckle_y = knuckles.iter().map(|&i| hand[i].y).sum::<f32>() / knuckles.len() as f32;
    pose.raised() == 0 && knuckle_y < hand[landmark::WRIST].y
}

fn open_palm(hand: &LandmarkSet, pose: FingerPose) -> bool {
    let tips = [
        landmark::INDEX_TIP,
        landmark::MIDDLE_TIP,
        landmark::RING_TIP,
        landmark::PINKY_TIP,
    ];
    pose.raised() >= 4 && tips.iter().all(|&i| hand[i].y <= hand[landmark::WRIST].y)
}

fn point_up(hand: &LandmarkSet, pose: FingerPose) -> bool {
    matches!(pose.0, [false, true, false, false, false])
        && hand[landmark::INDEX_TIP].y < hand[landmark::MIDDLE_PIP].y
        && hand[landmark::INDEX_TIP].y < hand[landmark::RING_PIP].y
}

fn loose_fist(_hand: &LandmarkSet, pose: FingerPose) -> bool {
    pose.raised() <= 1
}

fn l_shape(_hand: &LandmarkSet, pose: FingerPose) -> bool {
    matches!(pose.0, [true, true, false, false, false])
}

fn loose_peace(_hand: &LandmarkSet, pose: FingerPose) -> bool {
    matches!(pose.0, [_, true, true, false, false])
}

fn loose_open_palm(_hand: &LandmarkSet, pose: FingerPose) -> bool {
    pose.raised() >= 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::fingers::finger_pose;
    use crate::hand::fixtures;

    #[test]
    fn peace_requires_spread_tips() {
        // Index and middle raised but touching: the gap check must reject it.
        let mut hand = fixtures::fist();
        let raised = fixtures::peace();
        for i in [
            landmark::INDEX_MCP,
            landmark::INDEX_PIP,
            landmark::INDEX_DIP,
            landmark::INDEX_TIP,
        ] {
            hand[i] = raised[i];
        }
        for (src, dst) in [
            (landmark::INDEX_MCP, landmark::MIDDLE_MCP),
            (landmark::INDEX_PIP, landmark::MIDDLE_PIP),
            (landmark::INDEX_DIP, landmark::MIDDLE_DIP),
            (landmark::INDEX_TIP, landmark::MIDDLE_TIP),
        ] {
            hand[dst] = raised[src];
            hand[dst].x += 0.02;
        }
        assert!(!peace(&hand, finger_pose(&hand)));
        assert!(loose_peace(&hand, finger_pose(&hand)));
    }

    #[test]
    fn fist_requires_knuckles_above_the_wrist() {
        // An inverted curled hand has its knuckles below the wrist and must
        // not read as a fist in the fine vocabulary.
        let hand = fixtures::thumbs_down();
        let mut pose = finger_pose(&hand);
        pose.0[0] = false;
        assert!(!fist(&hand, pose));
        assert!(loose_fist(&hand, pose));
    }
}
