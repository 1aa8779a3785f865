//! Squat rep counter
//!
//! Tracks the left knee angle (hip→knee→ankle). A rep is counted on the way
//! down, once the knee closes past the depth threshold while the left
//! shoulder has dropped visibly below where it sat when the athlete last
//! stood up. The shoulder check keeps a bent-knee stance from counting while
//! the athlete is still upright.

use crate::core::config::Thresholds;
use crate::core::geometry::joint_angle;
use crate::core::rep_counter::RepCounter;
use crate::models::error::AnalysisResult;
use crate::models::exercise::{Exercise, ExerciseState, Feedback, Position, RepUpdate};
use crate::models::pose::{BodyLandmark, BodyPose};

#[derive(Debug, Clone, PartialEq)]
pub struct SquatCounter {
    count: u32,
    position: Position,
    shoulder_reference_y: Option<f64>,
}

impl Default for SquatCounter {
    fn default() -> Self {
        Self {
            count: 0,
            position: Position::Up,
            shoulder_reference_y: None,
        }
    }
}

impl SquatCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn shoulder_reference_y(&self) -> Option<f64> {
        self.shoulder_reference_y
    }

    /// Advance the state machine with an already computed knee angle
    pub fn advance(&mut self, knee_angle: f64, shoulder_y: f64, thresholds: &Thresholds) -> bool {
        if self.position == Position::Up && self.shoulder_reference_y.is_none() {
            self.shoulder_reference_y = Some(shoulder_y);
        }

        if knee_angle > thresholds.squat_up_angle {
            // Re-baseline every time the athlete stands to absorb camera drift
            self.position = Position::Up;
            self.shoulder_reference_y = Some(shoulder_y);
        }

        let shoulder_dropped = self
            .shoulder_reference_y
            .map_or(false, |reference| shoulder_y > reference + thresholds.squat_shoulder_drop);

        if knee_angle < thresholds.squat_down_angle
            && self.position == Position::Up
            && shoulder_dropped
        {
            self.position = Position::Down;
            self.count += 1;
            return true;
        }

        false
    }

    pub fn feedback(knee_angle: f64, thresholds: &Thresholds) -> Feedback {
        if knee_angle > thresholds.squat_up_angle {
            Feedback::StandTall
        } else if knee_angle < thresholds.squat_down_angle {
            Feedback::SquatLow
        } else {
            Feedback::GoodDepth
        }
    }
}

impl RepCounter for SquatCounter {
    fn exercise(&self) -> Exercise {
        Exercise::Squat
    }

    fn update(
        &mut self,
        pose: &BodyPose,
        thresholds: &Thresholds,
        min_visibility: f64,
    ) -> AnalysisResult<RepUpdate> {
        let knee_angle = joint_angle(
            pose,
            [BodyLandmark::LeftHip, BodyLandmark::LeftKnee, BodyLandmark::LeftAnkle],
            min_visibility,
        )?;
        let shoulder = pose.point(BodyLandmark::LeftShoulder, min_visibility)?;
        let rep_completed = self.advance(knee_angle, shoulder.y, thresholds);

        if rep_completed {
            tracing::debug!(
                exercise = "squat",
                count = self.count,
                knee_angle,
                "Squat rep completed"
            );
        }

        Ok(RepUpdate {
            count: self.count,
            feedback: Self::feedback(knee_angle, thresholds),
            angles: vec![knee_angle],
            rep_completed,
        })
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn state(&self) -> ExerciseState {
        ExerciseState::Squat {
            count: self.count,
            position: self.position,
            shoulder_reference_y: self.shoulder_reference_y,
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::calculate_angle;
    use crate::models::error::AnalysisError;
    use crate::models::pose::Keypoint;

    /// Left-side pose with the knee bent to `knee_angle` and the shoulder at `shoulder_y`
    fn squat_pose(knee_angle: f64, shoulder_y: f64) -> BodyPose {
        let knee = (0.5, 0.7);
        let theta = knee_angle.to_radians();
        let mut pose = BodyPose::default();
        pose.set(BodyLandmark::LeftShoulder, Keypoint::new(0.5, shoulder_y));
        // Ankle straight below the knee, hip rotated away by the knee angle
        pose.set(BodyLandmark::LeftAnkle, Keypoint::new(knee.0, knee.1 + 0.2));
        pose.set(BodyLandmark::LeftKnee, Keypoint::new(knee.0, knee.1));
        pose.set(
            BodyLandmark::LeftHip,
            Keypoint::new(knee.0 + 0.2 * theta.sin(), knee.1 + 0.2 * theta.cos()),
        );
        pose
    }

    #[test]
    fn test_synthetic_pose_angle() {
        let pose = squat_pose(80.0, 0.5);
        let angle = calculate_angle(
            pose.point(BodyLandmark::LeftHip, 0.0).unwrap(),
            pose.point(BodyLandmark::LeftKnee, 0.0).unwrap(),
            pose.point(BodyLandmark::LeftAnkle, 0.0).unwrap(),
        );
        assert!((angle - 80.0).abs() < 1e-6);
    }

    #[test]
    fn test_counts_one_rep_per_descent() {
        let thresholds = Thresholds::default();
        let mut counter = SquatCounter::new();

        counter.update(&squat_pose(170.0, 0.5), &thresholds, 0.5).unwrap();
        counter.update(&squat_pose(170.0, 0.5), &thresholds, 0.5).unwrap();
        let update = counter.update(&squat_pose(80.0, 0.53), &thresholds, 0.5).unwrap();
        assert_eq!(update.count, 1);
        assert!(update.rep_completed);
        assert_eq!(counter.position(), Position::Down);

        // Staying at the bottom does not count again
        let update = counter.update(&squat_pose(80.0, 0.53), &thresholds, 0.5).unwrap();
        assert_eq!(update.count, 1);
        assert!(!update.rep_completed);

        // Stand, descend again
        counter.update(&squat_pose(170.0, 0.5), &thresholds, 0.5).unwrap();
        let update = counter.update(&squat_pose(80.0, 0.53), &thresholds, 0.5).unwrap();
        assert_eq!(update.count, 2);
    }

    #[test]
    fn test_knee_bend_without_shoulder_drop_is_ignored() {
        let thresholds = Thresholds::default();
        let mut counter = SquatCounter::new();

        counter.update(&squat_pose(170.0, 0.5), &thresholds, 0.5).unwrap();
        let update = counter.update(&squat_pose(80.0, 0.51), &thresholds, 0.5).unwrap();
        assert_eq!(update.count, 0);
        assert_eq!(counter.position(), Position::Up);

        // Exactly at the drop threshold is still not enough
        assert!(!counter.advance(80.0, 0.52, &thresholds));
    }

    #[test]
    fn test_first_frame_records_reference() {
        let thresholds = Thresholds::default();
        let mut counter = SquatCounter::new();

        // Mid-range first frame still baselines the shoulder
        counter.advance(120.0, 0.4, &thresholds);
        assert_eq!(counter.shoulder_reference_y(), Some(0.4));

        // A later mid-range frame does not move it
        counter.advance(120.0, 0.45, &thresholds);
        assert_eq!(counter.shoulder_reference_y(), Some(0.4));

        // Standing re-baselines
        counter.advance(175.0, 0.38, &thresholds);
        assert_eq!(counter.shoulder_reference_y(), Some(0.38));
    }

    #[test]
    fn test_mid_range_holds_position() {
        let thresholds = Thresholds::default();
        let mut counter = SquatCounter::new();

        counter.advance(170.0, 0.5, &thresholds);
        counter.advance(80.0, 0.6, &thresholds);
        assert_eq!(counter.position(), Position::Down);

        counter.advance(120.0, 0.55, &thresholds);
        assert_eq!(counter.position(), Position::Down);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_feedback_follows_angle() {
        let thresholds = Thresholds::default();
        assert_eq!(SquatCounter::feedback(170.0, &thresholds), Feedback::StandTall);
        assert_eq!(SquatCounter::feedback(160.0, &thresholds), Feedback::GoodDepth);
        assert_eq!(SquatCounter::feedback(120.0, &thresholds), Feedback::GoodDepth);
        assert_eq!(SquatCounter::feedback(90.0, &thresholds), Feedback::GoodDepth);
        assert_eq!(SquatCounter::feedback(89.9, &thresholds), Feedback::SquatLow);
    }

    #[test]
    fn test_missing_landmark_leaves_state_untouched() {
        let thresholds = Thresholds::default();
        let mut counter = SquatCounter::new();
        counter.update(&squat_pose(170.0, 0.5), &thresholds, 0.5).unwrap();
        let before = counter.clone();

        let mut pose = squat_pose(80.0, 0.6);
        pose.set(BodyLandmark::LeftAnkle, Keypoint::with_visibility(0.5, 0.9, 0.1));
        let err = counter.update(&pose, &thresholds, 0.5).unwrap_err();
        assert!(matches!(err, AnalysisError::LowVisibility { .. }));
        assert_eq!(counter, before);
    }

    #[test]
    fn test_reset() {
        let thresholds = Thresholds::default();
        let mut counter = SquatCounter::new();
        counter.advance(170.0, 0.5, &thresholds);
        counter.advance(80.0, 0.6, &thresholds);
        assert_eq!(counter.count(), 1);

        counter.reset();
        assert_eq!(counter, SquatCounter::default());
        assert_eq!(
            counter.state(),
            ExerciseState::Squat {
                count: 0,
                position: Position::Up,
                shoulder_reference_y: None,
            }
        );
    }

    #[test]
    fn test_collapsed_leg_leaves_state_alone() {
        let thresholds = Thresholds::default();
        let mut counter = SquatCounter::new();
        counter.update(&squat_pose(170.0, 0.5), &thresholds, 0.5).unwrap();

        // Hip on top of the knee at a lowered shoulder
        let mut pose = squat_pose(170.0, 0.6);
        pose.set(BodyLandmark::LeftHip, Keypoint::new(0.5, 0.7));
        let err = counter.update(&pose, &thresholds, 0.5).unwrap_err();
        assert_eq!(err, AnalysisError::DegenerateGeometry(BodyLandmark::LeftKnee));
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.shoulder_reference_y(), Some(0.5));
    }
}
