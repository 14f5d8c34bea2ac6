//! Ranker - order candidates by score.

use crate::error::{EvaluationError, Result};
use data_loader::StallId;
use std::cmp::Ordering;

/// Candidates sorted by descending score.
///
/// The sort is stable, so equal scores keep candidate order. NaN scores
/// sort after every number. Inputs are not modified.
pub fn rank(candidates: &[StallId], scores: &[f32]) -> Result<Vec<StallId>> {
    if candidates.len() != scores.len() {
        return Err(EvaluationError::LengthMismatch {
            candidates: candidates.len(),
            scores: scores.len(),
        });
    }

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| descending(scores[a], scores[b]));

    Ok(order.into_iter().map(|i| candidates[i].clone()).collect())
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
