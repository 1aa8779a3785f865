// Error types for frame analysis

use crate::models::pose::BodyLandmark;

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("No pose detected")]
    NoPoseDetected,

    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    #[error("Landmark {0} missing from pose")]
    MissingLandmark(BodyLandmark),

    #[error("Landmark {0} has non-finite coordinates")]
    InvalidCoordinate(BodyLandmark),

    #[error("Landmark {landmark} visibility {visibility:.2} below threshold")]
    LowVisibility {
        landmark: BodyLandmark,
        visibility: f64,
    },

    #[error("Degenerate geometry at {0}: limb segment has zero length")]
    DegenerateGeometry(BodyLandmark),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session limit of {0} reached")]
    SessionLimit(usize),
}

impl AnalysisError {
    /// Whether the error came from deriving angles out of a detected pose
    pub fn is_computation_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::MissingLandmark(_)
                | AnalysisError::InvalidCoordinate(_)
                | AnalysisError::LowVisibility { .. }
                | AnalysisError::DegenerateGeometry(_)
                | AnalysisError::InvalidFrame(_)
        )
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(AnalysisError::NoPoseDetected.to_string(), "No pose detected");
        assert_eq!(
            AnalysisError::MissingLandmark(BodyLandmark::LeftAnkle).to_string(),
            "Landmark left_ankle missing from pose"
        );
        assert_eq!(
            AnalysisError::LowVisibility {
                landmark: BodyLandmark::RightWrist,
                visibility: 0.2,
            }
            .to_string(),
            "Landmark right_wrist visibility 0.20 below threshold"
        );
    }

    #[test]
    fn test_computation_error_classification() {
        assert!(AnalysisError::MissingLandmark(BodyLandmark::LeftHip).is_computation_error());
        assert!(AnalysisError::InvalidFrame("x".into()).is_computation_error());
        assert!(AnalysisError::DegenerateGeometry(BodyLandmark::LeftKnee).is_computation_error());
        assert!(!AnalysisError::NoPoseDetected.is_computation_error());
        assert!(!AnalysisError::UnknownExercise("plank".into()).is_computation_error());
    }
}
