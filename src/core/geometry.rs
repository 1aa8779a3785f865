//! Joint angle calculation
//!
//! Angles are measured at the middle landmark between the two limb segments
//! that meet there, e.g. hip→knee→ankle gives the knee angle.

use crate::models::error::{AnalysisError, AnalysisResult};
use crate::models::pose::{BodyLandmark, BodyPose, Point2};

/// Angle reported when a limb segment has no length
pub const DEGENERATE_ANGLE: f64 = 0.0;

const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Calculate the angle at `b` in degrees, in `[0, 180]`
///
/// Uses the difference of the two segment headings:
/// `|atan2(c - b) - atan2(a - b)|`, folded back into the half turn.
///
/// - 180° = fully straight (a, b, c collinear with b between)
/// - 90° = right angle
pub fn calculate_angle(a: Point2, b: Point2, c: Point2) -> f64 {
    if is_degenerate(a, b, c) {
        return DEGENERATE_ANGLE;
    }

    let (ax, ay) = (a.x - b.x, a.y - b.y);
    let (cx, cy) = (c.x - b.x, c.y - b.y);

    let radians = cy.atan2(cx) - ay.atan2(ax);
    let angle = radians.to_degrees().abs();

    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// True when either segment meeting at `b` has no length
pub fn is_degenerate(a: Point2, b: Point2, c: Point2) -> bool {
    (a.x - b.x).hypot(a.y - b.y) < MIN_SEGMENT_LENGTH
        || (c.x - b.x).hypot(c.y - b.y) < MIN_SEGMENT_LENGTH
}

/// Angle at the middle landmark of `joint`, read from `pose`
///
/// All three landmarks are looked up first. A collapsed limb is an error
/// rather than [`DEGENERATE_ANGLE`], so it can never pass for a bent joint.
pub fn joint_angle(
    pose: &BodyPose,
    joint: [BodyLandmark; 3],
    min_visibility: f64,
) -> AnalysisResult<f64> {
    let [first, vertex, last] = joint;
    let a = pose.point(first, min_visibility)?;
    let b = pose.point(vertex, min_visibility)?;
    let c = pose.point(last, min_visibility)?;

    if is_degenerate(a, b, c) {
        return Err(AnalysisError::DegenerateGeometry(vertex));
    }

    Ok(calculate_angle(a, b, c))
}
