// Data models for body pose landmarks consumed by the rep counters

use crate::models::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==============================================================================
// Body Landmarks (33 keypoints)
// ==============================================================================

/// MediaPipe Pose Landmark indices (33 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

/// Number of landmarks in a full MediaPipe body pose
pub const BODY_LANDMARK_COUNT: usize = 33;

impl BodyLandmark {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyLandmark::Nose => "nose",
            BodyLandmark::LeftEyeInner => "left_eye_inner",
            BodyLandmark::LeftEye => "left_eye",
            BodyLandmark::LeftEyeOuter => "left_eye_outer",
            BodyLandmark::RightEyeInner => "right_eye_inner",
            BodyLandmark::RightEye => "right_eye",
            BodyLandmark::RightEyeOuter => "right_eye_outer",
            BodyLandmark::LeftEar => "left_ear",
            BodyLandmark::RightEar => "right_ear",
            BodyLandmark::MouthLeft => "mouth_left",
            BodyLandmark::MouthRight => "mouth_right",
            BodyLandmark::LeftShoulder => "left_shoulder",
            BodyLandmark::RightShoulder => "right_shoulder",
            BodyLandmark::LeftElbow => "left_elbow",
            BodyLandmark::RightElbow => "right_elbow",
            BodyLandmark::LeftWrist => "left_wrist",
            BodyLandmark::RightWrist => "right_wrist",
            BodyLandmark::LeftPinky => "left_pinky",
            BodyLandmark::RightPinky => "right_pinky",
            BodyLandmark::LeftIndex => "left_index",
            BodyLandmark::RightIndex => "right_index",
            BodyLandmark::LeftThumb => "left_thumb",
            BodyLandmark::RightThumb => "right_thumb",
            BodyLandmark::LeftHip => "left_hip",
            BodyLandmark::RightHip => "right_hip",
            BodyLandmark::LeftKnee => "left_knee",
            BodyLandmark::RightKnee => "right_knee",
            BodyLandmark::LeftAnkle => "left_ankle",
            BodyLandmark::RightAnkle => "right_ankle",
            BodyLandmark::LeftHeel => "left_heel",
            BodyLandmark::RightHeel => "right_heel",
            BodyLandmark::LeftFootIndex => "left_foot_index",
            BodyLandmark::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for BodyLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// Keypoints
// ==============================================================================

/// A 2D point in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A detected landmark as reported by the pose estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64, // Normalized [0, 1] for image coordinates
    pub y: f64, // Normalized [0, 1], grows downwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>, // Estimator confidence [0, 1], absent means trusted
}

impl Keypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    pub fn with_visibility(x: f64, y: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            visibility: Some(visibility),
        }
    }

    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility.map_or(true, |v| v >= threshold)
    }

    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

// ==============================================================================
// Body Pose
// ==============================================================================

/// All landmarks detected for one person in one frame, in MediaPipe order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyPose {
    keypoints: Vec<Keypoint>,
}

impl BodyPose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    /// Build a pose from `[x, y, visibility]` triples
    pub fn from_flat(values: &[f64]) -> AnalysisResult<Self> {
        if values.len() % 3 != 0 {
            return Err(AnalysisError::InvalidFrame(format!(
                "expected x, y, visibility triples but got {} values",
                values.len()
            )));
        }

        let keypoints = values
            .chunks_exact(3)
            .map(|c| Keypoint::with_visibility(c[0], c[1], c[2]))
            .collect();

        Ok(Self { keypoints })
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    pub fn get(&self, landmark: BodyLandmark) -> Option<&Keypoint> {
        self.keypoints.get(landmark.index())
    }

    /// Look up a landmark and check it is usable for angle math
    pub fn point(&self, landmark: BodyLandmark, min_visibility: f64) -> AnalysisResult<Point2> {
        let keypoint = self
            .get(landmark)
            .ok_or(AnalysisError::MissingLandmark(landmark))?;

        if !keypoint.x.is_finite() || !keypoint.y.is_finite() {
            return Err(AnalysisError::InvalidCoordinate(landmark));
        }

        if !keypoint.is_visible(min_visibility) {
            return Err(AnalysisError::LowVisibility {
                landmark,
                visibility: keypoint.visibility.unwrap_or_default(),
            });
        }

        Ok(keypoint.point())
    }

    /// Set a single landmark, growing the pose with hidden placeholders if needed
    pub fn set(&mut self, landmark: BodyLandmark, keypoint: Keypoint) {
        let index = landmark.index();
        if self.keypoints.len() <= index {
            self.keypoints
                .resize(index + 1, Keypoint::with_visibility(0.0, 0.0, 0.0));
        }
        self.keypoints[index] = keypoint;
    }
}

impl From<Vec<Keypoint>> for BodyPose {
    fn from(keypoints: Vec<Keypoint>) -> Self {
        Self::new(keypoints)
    }
}
