//! Frame analysis
//!
//! Routes one frame of landmarks to the matching rep counter of a session
//! and turns the outcome into the `{reps, feedback}` pair shown to the
//! athlete.

use crate::core::config::Config;
use crate::core::session_manager::WorkoutSession;
use crate::models::error::{AnalysisError, AnalysisResult};
use crate::models::exercise::{AnalysisOutcome, Exercise, FrameResponse};
use crate::models::pose::BodyPose;

pub struct FrameAnalyzer {
    config: Config,
}

impl FrameAnalyzer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze one frame for `exercise` within `session`
    ///
    /// `pose` is `None` when the estimator found nobody in the frame. The
    /// session's counter only moves on success.
    pub fn analyze(
        &self,
        session: &mut WorkoutSession,
        pose: Option<&BodyPose>,
        exercise: &str,
    ) -> AnalysisResult<AnalysisOutcome> {
        let result = self.run(session, pose, exercise);
        session.record_frame(&result);

        if let Err(e) = &result {
            if e.is_computation_error() {
                tracing::warn!(session_id = session.id(), exercise, error = %e, "Frame analysis failed");
            } else {
                tracing::debug!(session_id = session.id(), exercise, error = %e, "Frame skipped");
            }
        }

        result
    }

    fn run(
        &self,
        session: &mut WorkoutSession,
        pose: Option<&BodyPose>,
        exercise: &str,
    ) -> AnalysisResult<AnalysisOutcome> {
        let exercise: Exercise = exercise.parse()?;
        let pose = pose.ok_or(AnalysisError::NoPoseDetected)?;

        let update = session.counter_mut(exercise).update(
            pose,
            &self.config.thresholds,
            self.config.min_landmark_visibility,
        )?;

        Ok(AnalysisOutcome {
            exercise,
            count: update.count,
            feedback: update.feedback,
            angles: update.angles,
            rep_completed: update.rep_completed,
        })
    }

    /// Analyze and convert straight to the caller-facing response
    pub fn analyze_frame(
        &self,
        session: &mut WorkoutSession,
        pose: Option<&BodyPose>,
        exercise: &str,
    ) -> FrameResponse {
        let result = self.analyze(session, pose, exercise);
        FrameResponse::from_result(&result, session, exercise)
    }
}

impl FrameResponse {
    pub fn unknown_exercise() -> Self {
        Self {
            reps: 0,
            feedback: "Unknown exercise".to_string(),
        }
    }

    pub fn no_pose(reps: u32) -> Self {
        Self {
            reps,
            feedback: "No pose detected".to_string(),
        }
    }

    /// Convert an analysis result into reps and a feedback line
    ///
    /// Failures never surface as errors: the last known count for the
    /// exercise is kept and the problem is described in the feedback.
    pub fn from_result(
        result: &AnalysisResult<AnalysisOutcome>,
        session: &WorkoutSession,
        exercise: &str,
    ) -> Self {
        let last_count = || {
            exercise
                .parse::<Exercise>()
                .map(|exercise| session.count(exercise))
                .unwrap_or(0)
        };

        match result {
            Ok(outcome) => Self {
                reps: outcome.count,
                feedback: outcome.feedback.to_string(),
            },
            Err(AnalysisError::UnknownExercise(_)) => Self::unknown_exercise(),
            Err(AnalysisError::NoPoseDetected) => Self::no_pose(last_count()),
            Err(e) => Self {
                reps: last_count(),
                feedback: format!("Error: {}", e),
            },
        }
    }
}
