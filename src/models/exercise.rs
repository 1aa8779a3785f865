// Data models for exercises, rep phases and form feedback

use crate::models::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==============================================================================
// Exercise Types
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    Squat,
    Pushup,
    BicepCurl,
}

impl Exercise {
    pub const ALL: [Exercise; 3] = [Exercise::Squat, Exercise::Pushup, Exercise::BicepCurl];

    pub fn as_str(&self) -> &'static str {
        match self {
            Exercise::Squat => "squat",
            Exercise::Pushup => "pushup",
            Exercise::BicepCurl => "bicep_curl",
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exercise {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "squat" | "squats" => Ok(Exercise::Squat),
            "pushup" | "push_up" | "push-up" | "pushups" => Ok(Exercise::Pushup),
            "bicep_curl" | "bicep-curl" | "biceps_curl" | "curl" => Ok(Exercise::BicepCurl),
            _ => Err(AnalysisError::UnknownExercise(s.to_string())),
        }
    }
}

/// Discrete phase of a rep cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Up,
    Down,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Up => "up",
            Position::Down => "down",
        }
    }
}

// ==============================================================================
// Feedback
// ==============================================================================

/// Form cue shown to the athlete for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    // Squat
    StandTall,
    SquatLow,
    GoodDepth,

    // Push-up and curl
    GoodForm,
    TightenCore,

    // Curl
    ExtendArm,
    FullCurl,
}

impl Feedback {
    pub fn message(&self) -> &'static str {
        match self {
            Feedback::StandTall => "Stand tall!",
            Feedback::SquatLow => "Squat low!",
            Feedback::GoodDepth => "Good depth!",
            Feedback::GoodForm => "Good form!",
            Feedback::TightenCore => "Keep your core tight!",
            Feedback::ExtendArm => "Extend your arm!",
            Feedback::FullCurl => "Full curl!",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ==============================================================================
// Rep State
// ==============================================================================

/// Snapshot of one exercise's counter state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "exercise", rename_all = "snake_case")]
pub enum ExerciseState {
    Squat {
        count: u32,
        position: Position,
        shoulder_reference_y: Option<f64>,
    },
    Pushup {
        count: u32,
        position: Option<Position>,
    },
    BicepCurl {
        count: u32,
        position: Position,
    },
}

impl ExerciseState {
    pub fn count(&self) -> u32 {
        match self {
            ExerciseState::Squat { count, .. }
            | ExerciseState::Pushup { count, .. }
            | ExerciseState::BicepCurl { count, .. } => *count,
        }
    }
}

/// Result of feeding one frame into a rep counter
#[derive(Debug, Clone, PartialEq)]
pub struct RepUpdate {
    pub count: u32,
    pub feedback: Feedback,
    pub angles: Vec<f64>, // Joint angles used this frame, in degrees
    pub rep_completed: bool,
}

/// Successful analysis of a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub exercise: Exercise,
    pub count: u32,
    pub feedback: Feedback,
    pub angles: Vec<f64>,
    pub rep_completed: bool,
}

// ==============================================================================
// DTOs
// ==============================================================================

/// What the caller sees for every frame, success or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameResponse {
    pub reps: u32,
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_parsing() {
        assert_eq!("squat".parse::<Exercise>().unwrap(), Exercise::Squat);
        assert_eq!(" PushUp ".parse::<Exercise>().unwrap(), Exercise::Pushup);
        assert_eq!("push-up".parse::<Exercise>().unwrap(), Exercise::Pushup);
        assert_eq!("bicep_curl".parse::<Exercise>().unwrap(), Exercise::BicepCurl);
        assert_eq!(
            "plank".parse::<Exercise>(),
            Err(AnalysisError::UnknownExercise("plank".to_string()))
        );
    }

    #[test]
    fn test_exercise_identifiers_round_trip() {
        for exercise in Exercise::ALL {
            assert_eq!(exercise.as_str().parse::<Exercise>().unwrap(), exercise);
        }
        assert_eq!(
            serde_json::to_string(&Exercise::BicepCurl).unwrap(),
            "\"bicep_curl\""
        );
    }

    #[test]
    fn test_feedback_messages() {
        assert_eq!(Feedback::StandTall.to_string(), "Stand tall!");
        assert_eq!(Feedback::TightenCore.to_string(), "Keep your core tight!");
        assert_eq!(Feedback::FullCurl.message(), "Full curl!");
    }

    #[test]
    fn test_exercise_state_serialization() {
        let state = ExerciseState::Pushup {
            count: 3,
            position: None,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["exercise"], "pushup");
        assert_eq!(json["count"], 3);
        assert!(json["position"].is_null());
        assert_eq!(state.count(), 3);
    }
}
