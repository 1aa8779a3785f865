// Shared interface of the per-exercise rep counting state machines

use crate::core::config::Thresholds;
use crate::models::error::AnalysisResult;
use crate::models::exercise::{Exercise, ExerciseState, RepUpdate};
use crate::models::pose::BodyPose;

/// A rep counting state machine for one exercise
///
/// `update` reads every landmark and computes every angle before touching
/// state, so a frame that fails leaves the counter exactly as it was.
pub trait RepCounter: Send + Sync {
    fn exercise(&self) -> Exercise;

    /// Feed one frame of landmarks and advance the state machine
    fn update(
        &mut self,
        pose: &BodyPose,
        thresholds: &Thresholds,
        min_visibility: f64,
    ) -> AnalysisResult<RepUpdate>;

    /// Completed repetitions so far
    fn count(&self) -> u32;

    fn state(&self) -> ExerciseState;

    /// Back to the initial phase with a zero count
    fn reset(&mut self);
}
