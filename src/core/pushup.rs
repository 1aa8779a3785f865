//! Push-up rep counter
//!
//! Tracks the left elbow angle (shoulder→elbow→wrist). The phase starts
//! unknown: a descent only counts once the arm has been seen locked out,
//! so an athlete who starts at the bottom has to press up once before the
//! first rep registers.

use crate::core::config::Thresholds;
use crate::core::geometry::joint_angle;
use crate::core::rep_counter::RepCounter;
use crate::models::error::AnalysisResult;
use crate::models::exercise::{Exercise, ExerciseState, Feedback, Position, RepUpdate};
use crate::models::pose::{BodyLandmark, BodyPose};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushupCounter {
    count: u32,
    position: Option<Position>,
}

impl PushupCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Advance the state machine with an already computed elbow angle
    pub fn advance(&mut self, elbow_angle: f64, thresholds: &Thresholds) -> bool {
        if elbow_angle > thresholds.pushup_up_angle {
            self.position = Some(Position::Up);
        }

        if elbow_angle < thresholds.pushup_down_angle && self.position == Some(Position::Up) {
            self.position = Some(Position::Down);
            self.count += 1;
            return true;
        }

        false
    }

    pub fn feedback(elbow_angle: f64, thresholds: &Thresholds) -> Feedback {
        if thresholds.pushup_form_min_angle < elbow_angle
            && elbow_angle < thresholds.pushup_form_max_angle
        {
            Feedback::GoodForm
        } else {
            Feedback::TightenCore
        }
    }
}

impl RepCounter for PushupCounter {
    fn exercise(&self) -> Exercise {
        Exercise::Pushup
    }

    fn update(
        &mut self,
        pose: &BodyPose,
        thresholds: &Thresholds,
        min_visibility: f64,
    ) -> AnalysisResult<RepUpdate> {
        let elbow_angle = joint_angle(
            pose,
            [BodyLandmark::LeftShoulder, BodyLandmark::LeftElbow, BodyLandmark::LeftWrist],
            min_visibility,
        )?;
        let rep_completed = self.advance(elbow_angle, thresholds);

        if rep_completed {
            tracing::debug!(
                exercise = "pushup",
                count = self.count,
                elbow_angle,
                "Push-up rep completed"
            );
        }

        Ok(RepUpdate {
            count: self.count,
            feedback: Self::feedback(elbow_angle, thresholds),
            angles: vec![elbow_angle],
            rep_completed,
        })
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn state(&self) -> ExerciseState {
        ExerciseState::Pushup {
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
    use crate::core::geometry::calculate_angle;
    use crate::models::error::AnalysisError;
    use crate::models::pose::Keypoint;

    /// Left arm bent to `elbow_angle`
    fn arm_pose(elbow_angle: f64) -> BodyPose {
        let elbow = (0.5, 0.5);
        let theta = elbow_angle.to_radians();
        let mut pose = BodyPose::default();
        pose.set(BodyLandmark::LeftShoulder, Keypoint::new(elbow.0 - 0.2, elbow.1));
        pose.set(BodyLandmark::LeftElbow, Keypoint::new(elbow.0, elbow.1));
        pose.set(
            BodyLandmark::LeftWrist,
            Keypoint::new(elbow.0 - 0.2 * theta.cos(), elbow.1 + 0.2 * theta.sin()),
        );
        pose
    }

    #[test]
    fn test_synthetic_pose_angle() {
        for expected in [30.0, 80.0, 120.0, 170.0] {
            let pose = arm_pose(expected);
            let angle = calculate_angle(
                pose.point(BodyLandmark::LeftShoulder, 0.0).unwrap(),
                pose.point(BodyLandmark::LeftElbow, 0.0).unwrap(),
                pose.point(BodyLandmark::LeftWrist, 0.0).unwrap(),
            );
            assert!((angle - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_counts_each_descent_after_lockout() {
        let thresholds = Thresholds::default();
        let mut counter = PushupCounter::new();

        let counts: Vec<u32> = [170.0, 80.0, 170.0, 80.0]
            .iter()
            .map(|&angle| counter.update(&arm_pose(angle), &thresholds, 0.5).unwrap().count)
            .collect();
        assert_eq!(counts, vec![0, 1, 1, 2]);
    }

    #[test]
    fn test_starting_at_bottom_is_not_counted() {
        let thresholds = Thresholds::default();
        let mut counter = PushupCounter::new();

        let update = counter.update(&arm_pose(80.0), &thresholds, 0.5).unwrap();
        assert_eq!(update.count, 0);
        assert_eq!(counter.position(), None);

        // First lockout arms the counter, the next descent counts
        counter.update(&arm_pose(170.0), &thresholds, 0.5).unwrap();
        let update = counter.update(&arm_pose(80.0), &thresholds, 0.5).unwrap();
        assert_eq!(update.count, 1);
    }

    #[test]
    fn test_repeated_bottom_frame_counts_once() {
        let thresholds = Thresholds::default();
        let mut counter = PushupCounter::new();

        counter.advance(170.0, &thresholds);
        assert!(counter.advance(80.0, &thresholds));
        assert!(!counter.advance(80.0, &thresholds));
        assert!(!counter.advance(120.0, &thresholds));
        assert_eq!(counter.count(), 1);
        assert_eq!(counter.position(), Some(Position::Down));
    }

    #[test]
    fn test_feedback_band_is_exclusive() {
        let thresholds = Thresholds::default();
        assert_eq!(PushupCounter::feedback(120.0, &thresholds), Feedback::GoodForm);
        assert_eq!(PushupCounter::feedback(80.0, &thresholds), Feedback::TightenCore);
        assert_eq!(PushupCounter::feedback(160.0, &thresholds), Feedback::TightenCore);
        assert_eq!(PushupCounter::feedback(170.0, &thresholds), Feedback::TightenCore);
        assert_eq!(PushupCounter::feedback(45.0, &thresholds), Feedback::TightenCore);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds {
            pushup_up_angle: 150.0,
            pushup_down_angle: 100.0,
            ..Thresholds::default()
        };
        let mut counter = PushupCounter::new();
        counter.advance(155.0, &thresholds);
        assert!(counter.advance(95.0, &thresholds));
    }

    #[test]
    fn test_collapsed_arm_leaves_state_alone() {
        let thresholds = Thresholds::default();
        let mut counter = PushupCounter::new();
        counter.update(&arm_pose(170.0), &thresholds, 0.5).unwrap();

        let mut pose = BodyPose::default();
        for landmark in [BodyLandmark::LeftShoulder, BodyLandmark::LeftElbow, BodyLandmark::LeftWrist] {
            pose.set(landmark, Keypoint::new(0.5, 0.5));
        }
        let err = counter.update(&pose, &thresholds, 0.5).unwrap_err();
        assert_eq!(err, AnalysisError::DegenerateGeometry(BodyLandmark::LeftElbow));
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.position(), Some(Position::Up));
    }
}
