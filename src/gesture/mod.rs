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

//! Gesture identifiers and the rule-table classifier.
//!
//! Classification evaluates a fixed, ordered table of named predicate rules;
//! the first rule whose predicate holds wins and no later rule is consulted.
//! Order matters: the predicates are not mutually exclusive by construction
//! (a thumbs-up also looks like the start of a fist), so each vocabulary in
//! [`vocab`] documents and fixes its own precedence. A hand matching no rule
//! classifies as [`Gesture::Unknown`], which is an ordinary result rather
//! than an error.
//!
//! New gestures are added by registering a rule in a vocabulary, not by
//! editing branching code.

pub(crate) mod vocab;

use serde::{Deserialize, Serialize};

use crate::hand::LandmarkSet;
use crate::hand::fingers::FingerPose;

/// The closed set of hand shapes the rule tables can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Gesture {
    Unknown,
    OpenPalm,
    Fist,
    Peace,
    LShape,
    PointUp,
    ThumbsUp,
    ThumbsDown,
}

impl Gesture {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Gesture::Unknown => "none",
            Gesture::OpenPalm => "open palm",
            Gesture::Fist => "fist",
            Gesture::Peace => "peace sign",
            Gesture::LShape => "L-shape",
            Gesture::PointUp => "one finger",
            Gesture::ThumbsUp => "thumbs up",
            Gesture::ThumbsDown => "thumbs down",
        }
    }
}

/// Which rule table drives classification.
///
/// `Coarse` is the legacy four-gesture vocabulary with its loose count-only
/// predicates; `Fine` adds the thumb and pointing gestures behind stricter
/// geometric checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Vocabulary {
    Coarse,
    #[default]
    Fine,
}

impl Vocabulary {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Vocabulary::Coarse => "coarse",
            Vocabulary::Fine => "fine",
        }
    }
}

/// One entry of the classification table.
pub(crate) struct GestureRule {
    pub(crate) name: &'static str,
    pub(crate) gesture: Gesture,
    predicate: fn(&LandmarkSet, FingerPose) -> bool,
}

impl GestureRule {
    pub(crate) fn new(
        name: &'static str,
        gesture: Gesture,
        predicate: fn(&LandmarkSet, FingerPose) -> bool,
    ) -> Self {
        Self {
            name,
            gesture,
            predicate,
        }
    }
}

/// An ordered rule table.
pub(crate) struct GestureClassifier {
    rules: Vec<GestureRule>,
}

impl GestureClassifier {
    pub(crate) fn new(rules: Vec<GestureRule>) -> Self {
        Self { rules }
    }

    pub(crate) fn for_vocabulary(vocabulary: Vocabulary) -> Self {
        match vocabulary {
            Vocabulary::Coarse => Self::new(vocab::coarse_rules()),
            Vocabulary::Fine => Self::new(vocab::fine_rules()),
        }
    }

    /// Returns the highest-priority rule matching this hand, if any.
    pub(crate) fn matched_rule(
        &self,
        hand: &LandmarkSet,
        pose: FingerPose,
    ) -> Option<&GestureRule> {
        self.rules.iter().find(|rule| (rule.predicate)(hand, pose))
    }

    /// Classifies one hand. Exactly one gesture is produced per call.
    pub(crate) fn classify(&self, hand: &LandmarkSet, pose: FingerPose) -> Gesture {
        self.matched_rule(hand, pose)
            .map(|rule| rule.gesture)
            .unwrap_or(Gesture::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::fingers::finger_pose;
    use crate::hand::fixtures;

    fn classify_fine(hand: &LandmarkSet) -> Gesture {
        let classifier = GestureClassifier::for_vocabulary(Vocabulary::Fine);
        classifier.classify(hand, finger_pose(hand))
    }

    fn classify_coarse(hand: &LandmarkSet) -> Gesture {
        let classifier = GestureClassifier::for_vocabulary(Vocabulary::Coarse);
        classifier.classify(hand, finger_pose(hand))
    }

    #[test]
    fn fine_vocabulary_recognizes_each_shape() {
        assert_eq!(classify_fine(&fixtures::open_hand()), Gesture::OpenPalm);
        assert_eq!(classify_fine(&fixtures::fist()), Gesture::Fist);
        assert_eq!(classify_fine(&fixtures::peace()), Gesture::Peace);
        assert_eq!(classify_fine(&fixtures::point_up()), Gesture::PointUp);
        assert_eq!(classify_fine(&fixtures::thumbs_up()), Gesture::ThumbsUp);
        assert_eq!(classify_fine(&fixtures::thumbs_down()), Gesture::ThumbsDown);
    }

    #[test]
    fn all_tips_below_their_knuckles_is_always_a_fist() {
        // Precedence: nothing outranks the fist for a fully curled hand.
        assert_eq!(classify_fine(&fixtures::fist()), Gesture::Fist);
        assert_eq!(classify_coarse(&fixtures::fist()), Gesture::Fist);
    }

    #[test]
    fn l_shape_is_unknown_in_the_fine_vocabulary() {
        assert_eq!(classify_fine(&fixtures::l_shape()), Gesture::Unknown);
        assert_eq!(classify_coarse(&fixtures::l_shape()), Gesture::LShape);
    }

    #[test]
    fn coarse_vocabulary_reads_a_single_finger_as_a_fist() {
        // The loose predicate counts at most one raised digit as a fist.
        assert_eq!(classify_coarse(&fixtures::point_up()), Gesture::Fist);
    }

    #[test]
    fn coarse_vocabulary_recognizes_the_remaining_shapes() {
        assert_eq!(classify_coarse(&fixtures::open_hand()), Gesture::OpenPalm);
        assert_eq!(classify_coarse(&fixtures::peace()), Gesture::Peace);
    }

    #[test]
    fn matched_rule_reports_the_winning_entry() {
        let classifier = GestureClassifier::for_vocabulary(Vocabulary::Fine);
        let hand = fixtures::thumbs_up();
        let rule = classifier.matched_rule(&hand, finger_pose(&hand)).unwrap();
        assert_eq!(rule.name, "thumbs-up");
        assert_eq!(rule.gesture, Gesture::ThumbsUp);
    }
}
