//! Bicep curl rep counter
//!
//! Both elbows are tracked and must cross each threshold together: arms
//! extended arms the counter, both arms curled counts the rep. Curling one
//! arm at a time never registers.

use crate::core::config::Thresholds;
use crate::core::geometry::joint_angle;
use crate::core::rep_counter::RepCounter;
use crate::models::error::AnalysisResult;
use crate::models::exercise::{Exercise, ExerciseState, Feedback, Position, RepUpdate};
use crate::models::pose::{BodyLandmark, BodyPose};

#[derive(Debug, Clone, PartialEq)]
pub struct BicepCurlCounter {
    count: u32,
    position: Position,
}

impl Default for BicepCurlCounter {
    fn default() -> Self {
        Self {
            count: 0,
            position: Position::Down,
        }
    }
}

impl BicepCurlCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Advance the state machine with both elbow angles
    pub fn advance(&mut self, left_angle: f64, right_angle: f64, thresholds: &Thresholds) -> bool {
        let extended = thresholds.curl_extended_angle;
        let curled = thresholds.curl_curled_angle;

        if right_angle > extended && left_angle > extended {
            self.position = Position::Down;
        }

        if right_angle < curled && left_angle < curled && self.position == Position::Down {
            self.position = Position::Up;
            self.count += 1;
            return true;
        }

        false
    }

    /// The right arm is checked before the left, so a right-only curl gets
    /// the curl cue while a left-only curl does not
    pub fn feedback(left_angle: f64, right_angle: f64, thresholds: &Thresholds) -> Feedback {
        if right_angle > thresholds.curl_extended_angle && left_angle > thresholds.curl_extended_angle {
            Feedback::ExtendArm
        } else if right_angle < thresholds.curl_curled_angle {
            Feedback::FullCurl
        } else {
            Feedback::GoodForm
        }
    }
}

impl RepCounter for BicepCurlCounter {
    fn exercise(&self) -> Exercise {
        Exercise::BicepCurl
    }

    fn update(
        &mut self,
        pose: &BodyPose,
        thresholds: &Thresholds,
        min_visibility: f64,
    ) -> AnalysisResult<RepUpdate> {
        let right_angle = joint_angle(
            pose,
            [BodyLandmark::RightShoulder, BodyLandmark::RightElbow, BodyLandmark::RightWrist],
            min_visibility,
        )?;
        let left_angle = joint_angle(
            pose,
            [BodyLandmark::LeftShoulder, BodyLandmark::LeftElbow, BodyLandmark::LeftWrist],
            min_visibility,
        )?;
        let rep_completed = self.advance(left_angle, right_angle, thresholds);

        if rep_completed {
            tracing::debug!(
                exercise = "bicep_curl",
                count = self.count,
                left_angle,
                right_angle,
                "Bicep curl rep completed"
            );
        }

        Ok(RepUpdate {
            count: self.count,
            feedback: Self::feedback(left_angle, right_angle, thresholds),
            angles: vec![left_angle, right_angle],
            rep_completed,
        })
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn state(&self) -> ExerciseState {
        ExerciseState::BicepCurl {
            count: self.count,
            position: self.position,
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::error::AnalysisError;
    use crate::models::pose::Keypoint;

    fn set_arm(pose: &mut BodyPose, side: [BodyLandmark; 3], origin_x: f64, angle: f64) {
        let theta = angle.to_radians();
        let elbow = (origin_x, 0.5);
        pose.set(side[0], Keypoint::new(elbow.0, elbow.1 - 0.2));
        pose.set(side[1], Keypoint::new(elbow.0, elbow.1));
        pose.set(
            side[2],
            Keypoint::new(elbow.0 + 0.2 * theta.sin(), elbow.1 - 0.2 * theta.cos()),
        );
    }

    fn curl_pose(left_angle: f64, right_angle: f64) -> BodyPose {
        let mut pose = BodyPose::default();
        set_arm(
            &mut pose,
            [BodyLandmark::LeftShoulder, BodyLandmark::LeftElbow, BodyLandmark::LeftWrist],
            0.6,
            left_angle,
        );
        set_arm(
            &mut pose,
            [BodyLandmark::RightShoulder, BodyLandmark::RightElbow, BodyLandmark::RightWrist],
            0.4,
            right_angle,
        );
        pose
    }

    #[test]
    fn test_synthetic_pose_angles() {
        let thresholds = Thresholds::default();
        let mut counter = BicepCurlCounter::new();
        let update = counter.update(&curl_pose(40.0, 150.0), &thresholds, 0.5).unwrap();
        assert!((update.angles[0] - 40.0).abs() < 1e-6);
        assert!((update.angles[1] - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_symmetric_curl_counts() {
        let thresholds = Thresholds::default();
        let mut counter = BicepCurlCounter::new();

        let counts: Vec<u32> = [(150.0, 150.0), (150.0, 150.0), (40.0, 40.0)]
            .iter()
            .map(|&(l, r)| counter.update(&curl_pose(l, r), &thresholds, 0.5).unwrap().count)
            .collect();
        assert_eq!(counts, vec![0, 0, 1]);
        assert_eq!(counter.position(), Position::Up);

        // Holding the curl does not count again
        let update = counter.update(&curl_pose(40.0, 40.0), &thresholds, 0.5).unwrap();
        assert_eq!(update.count, 1);
        assert!(!update.rep_completed);
    }

    #[test]
    fn test_initial_position_allows_first_curl() {
        let thresholds = Thresholds::default();
        let mut counter = BicepCurlCounter::new();
        assert!(counter.advance(40.0, 40.0, &thresholds));
    }

    #[test]
    fn test_asymmetric_curl_never_counts() {
        let thresholds = Thresholds::default();
        let mut counter = BicepCurlCounter::new();

        for _ in 0..5 {
            counter.advance(150.0, 150.0, &thresholds);
            counter.advance(40.0, 150.0, &thresholds);
            counter.advance(150.0, 40.0, &thresholds);
        }
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_feedback_priority() {
        let thresholds = Thresholds::default();
        assert_eq!(
            BicepCurlCounter::feedback(150.0, 150.0, &thresholds),
            Feedback::ExtendArm
        );
        assert_eq!(
            BicepCurlCounter::feedback(150.0, 40.0, &thresholds),
            Feedback::FullCurl
        );
        assert_eq!(
            BicepCurlCounter::feedback(40.0, 40.0, &thresholds),
            Feedback::FullCurl
        );
        // Left-only curl falls through to the generic cue
        assert_eq!(
            BicepCurlCounter::feedback(40.0, 150.0, &thresholds),
            Feedback::GoodForm
        );
        assert_eq!(
            BicepCurlCounter::feedback(100.0, 100.0, &thresholds),
            Feedback::GoodForm
        );
    }

    #[test]
    fn test_needs_both_arms() {
        let thresholds = Thresholds::default();
        let mut counter = BicepCurlCounter::new();
        let mut pose = BodyPose::default();
        set_arm(
            &mut pose,
            [BodyLandmark::LeftShoulder, BodyLandmark::LeftElbow, BodyLandmark::LeftWrist],
            0.6,
            40.0,
        );
        let err = counter.update(&pose, &thresholds, 0.0).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingLandmark(BodyLandmark::RightWrist)
        ));
        assert_eq!(counter, BicepCurlCounter::default());
    }

    #[test]
    fn test_collapsed_arm_leaves_state_alone() {
        let thresholds = Thresholds::default();
        let mut counter = BicepCurlCounter::new();

        let mut pose = curl_pose(40.0, 40.0);
        pose.set(BodyLandmark::LeftWrist, Keypoint::new(0.6, 0.5));
        let err = counter.update(&pose, &thresholds, 0.5).unwrap_err();
        assert_eq!(err, AnalysisError::DegenerateGeometry(BodyLandmark::LeftElbow));
        assert_eq!(counter, BicepCurlCounter::default());
    }
}
