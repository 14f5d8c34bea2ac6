//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::filters::{EligibleUserFilter, KnownStallFilter, MinimumRatingFilter};
use crate::traits::Filter;
use anyhow::{Context, Result};
use data_loader::{Interaction, Snapshot};
use serde::Serialize;

/// Input and output counts of one filter in a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterStage {
    pub name: String,
    pub input: usize,
    pub output: usize,
}

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(MinimumRatingFilter::new(4.0))
///     .add_filter(KnownStallFilter)
///     .add_filter(EligibleUserFilter::new(10));
///
/// let filtered = pipeline.apply(interactions, &snapshot)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The evaluation pipeline: positives, known stalls, eligible users
    pub fn standard(min_rating: f32, min_interactions: usize) -> Self {
        Self::new()
            .add_filter(MinimumRatingFilter::new(min_rating))
            .add_filter(KnownStallFilter)
            .add_filter(EligibleUserFilter::new(min_interactions))
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Apply all filters in sequence to the interactions.
    pub fn apply(
        &self,
        interactions: Vec<Interaction>,
        snapshot: &Snapshot,
    ) -> Result<Vec<Interaction>> {
        self.apply_with_stages(interactions, snapshot)
            .map(|(filtered, _)| filtered)
    }

    /// Like [`FilterPipeline::apply`], also returning per-filter counts.
    ///
    /// ## Algorithm
    /// 1. Start with the input interactions
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count and record the stage
    /// 3. Return final filtered set
    pub fn apply_with_stages(
        &self,
        interactions: Vec<Interaction>,
        snapshot: &Snapshot,
    ) -> Result<(Vec<Interaction>, Vec<FilterStage>)> {
        let mut current = interactions;
        let mut stages = Vec::with_capacity(self.filters.len());

        for filter in &self.filters {
            let input = current.len();
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                input
            );
            current = filter
                .apply(current, snapshot)
                .with_context(|| format!("filter {} failed", filter.name()))?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
            stages.push(FilterStage {
                name: filter.name().to_string(),
                input,
                output: current.len(),
            });
        }
        Ok((current, stages))
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
