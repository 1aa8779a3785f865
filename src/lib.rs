//! Rep counting and form feedback from body pose landmarks.
//!
//! A pose estimator (outside this crate) turns each camera frame into
//! normalized 2D landmarks. [`core::analyzer::FrameAnalyzer`] feeds those
//! landmarks into the rep counter of the selected exercise inside a
//! [`core::session_manager::WorkoutSession`] and reports the running count
//! with a short feedback cue.

pub mod api;
pub mod cli;
pub mod core;
pub mod models;

pub use crate::core::analyzer::FrameAnalyzer;
pub use crate::core::config::{Config, Thresholds};
pub use crate::core::geometry::calculate_angle;
pub use crate::core::session_manager::{SessionManager, WorkoutSession};
pub use crate::models::error::{AnalysisError, AnalysisResult};
pub use crate::models::exercise::{Exercise, Feedback, FrameResponse};
pub use crate::models::pose::{BodyLandmark, BodyPose, Keypoint, Point2};
