//! Cosine-distance matching between face embeddings.
//!
//! One threshold drives both the login match and the enrollment uniqueness
//! check; this is a deliberate simplification and a configuration surface,
//! not a derived value. Lower threshold = stricter matching.

use super::embedding::Embedding;

/// Maximum cosine distance, returned for degenerate inputs (zero-norm or
/// mismatched dimensions) so they can never produce a match.
pub const MAX_DISTANCE: f32 = 2.0;

/// Cosine distance `1 - cos(a, b)` in `[0, 2]`.
///
/// Symmetric, and zero iff the vectors point in the same direction.
#[must_use]
pub fn cosine_distance(a: &Embedding, b: &Embedding) -> f32 {
    let (a, b) = (a.as_slice(), b.as_slice());
    if a.len() != b.len() || a.is_empty() {
        return MAX_DISTANCE;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let norms = norm_a.sqrt() * norm_b.sqrt();
    if norms == 0.0 || !norms.is_finite() {
        return MAX_DISTANCE;
    }

    (1.0 - dot / norms).clamp(0.0, MAX_DISTANCE)
}

/// Two embeddings count as the same face when their distance does not exceed
/// the configured threshold.
#[must_use]
pub fn is_match(distance: f32, threshold: f32) -> bool {
    distance <= threshold
}
