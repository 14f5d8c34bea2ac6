//! Small dense-vector helpers shared by the scorers.

use crate::error::{Result, ScoreError};
use std::collections::HashMap;

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn norm(a: &[f32]) -> f32 {
    dot(a, a).sqrt()
}

/// Cosine similarity; 0 when either vector has zero norm
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let denominator = norm(a) * norm(b);
    if denominator == 0.0 {
        0.0
    } else {
        dot(a, b) / denominator
    }
}

/// Check every vector in `vectors` has the same length.
///
/// Returns that length, or `expected` when the map is empty.
pub fn common_dimension(
    vectors: &HashMap<String, Vec<f32>>,
    expected: Option<usize>,
    what: &str,
) -> Result<Option<usize>> {
    let mut dimension = expected;
    for (id, vector) in vectors {
        match dimension {
            None => dimension = Some(vector.len()),
            Some(expected) if expected != vector.len() => {
                return Err(ScoreError::DimensionMismatch {
                    what: format!("{} {}", what, id),
                    expected,
                    found: vector.len(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(dimension)
}
