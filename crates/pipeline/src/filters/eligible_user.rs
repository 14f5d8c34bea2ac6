//! Filter to keep users with enough history to split.
//!
//! Users with fewer than `min_interactions` remaining interactions cannot
//! give a meaningful train/test split and are removed entirely, from both
//! halves. Run it after the rating and catalog filters so that only
//! qualifying interactions are counted.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{Interaction, Snapshot, UserId};
use std::collections::HashMap;

/// Removes every interaction of users below the interaction threshold.
///
/// ## Algorithm
/// 1. Count interactions per user
/// 2. Keep interactions whose user count >= min_interactions
///
/// Input order is preserved.
pub struct EligibleUserFilter {
    min_interactions: usize,
}

impl EligibleUserFilter {
    /// Create a new EligibleUserFilter.
    ///
    /// # Arguments
    /// * `min_interactions` - Inclusive threshold (typically 10)
    pub fn new(min_interactions: usize) -> Self {
        Self { min_interactions }
    }
}

impl Filter for EligibleUserFilter {
    fn name(&self) -> &str {
        "EligibleUserFilter"
    }

    fn apply(
        &self,
        interactions: Vec<Interaction>,
        _snapshot: &Snapshot,
    ) -> Result<Vec<Interaction>> {
        let mut counts: HashMap<UserId, usize> = HashMap::new();
        for interaction in &interactions {
            *counts.entry(interaction.user_id.clone()).or_insert(0) += 1;
        }

        let eligible = counts
            .values()
            .filter(|&&count| count >= self.min_interactions)
            .count();
        tracing::debug!(
            "{} of {} users have at least {} interactions",
            eligible,
            counts.len(),
            self.min_interactions
        );

        let filtered: Vec<Interaction> = interactions
            .into_iter()
            .filter(|interaction| counts[&interaction.user_id] >= self.min_interactions)
            .collect();

        Ok(filtered)
    }
}
