//! Evaluation configuration.
//!
//! Every knob has a default matching the hawker evaluation protocol, so an
//! empty JSON object (or no file at all) is a valid configuration:
//!
//! ```json
//! {
//!   "min_rating": 4.0,
//!   "min_interactions": 10,
//!   "fixed_pool_sizes": [50, 100, 200, 500, 1000, 2000],
//!   "cutoffs": [1, 2, 3, 5],
//!   "split": "chronological",
//!   "seed": 42,
//!   "load": { "reference_date": "2025-04-27", "exclude_non_food": true }
//! }
//! ```

use crate::error::{EvaluationError, Result};
use candidates::{DEFAULT_POOL_SIZES, SplitStrategy};
use data_loader::LoadOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cutoffs k reported in every table
pub const DEFAULT_CUTOFFS: [usize; 4] = [1, 2, 3, 5];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Inclusive rating threshold for a positive interaction
    pub min_rating: f32,
    /// Positive interactions a user needs to be evaluated
    pub min_interactions: usize,
    /// Pool sizes evaluated before the full universe
    pub fixed_pool_sizes: Vec<usize>,
    pub cutoffs: Vec<usize>,
    pub split: SplitStrategy,
    pub seed: u64,
    pub load: LoadOptions,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            min_rating: 4.0,
            min_interactions: 10,
            fixed_pool_sizes: DEFAULT_POOL_SIZES.to_vec(),
            cutoffs: DEFAULT_CUTOFFS.to_vec(),
            split: SplitStrategy::default(),
            seed: 42,
            load: LoadOptions::default(),
        }
    }
}

impl EvaluationConfig {
    /// Read a JSON config file; missing fields take their defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EvaluationError::io(path, e))?;
        let config: EvaluationConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_min_rating(mut self, min_rating: f32) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn with_min_interactions(mut self, min_interactions: usize) -> Self {
        self.min_interactions = min_interactions;
        self
    }

    pub fn with_fixed_pool_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.fixed_pool_sizes = sizes;
        self
    }

    pub fn with_cutoffs(mut self, cutoffs: Vec<usize>) -> Self {
        self.cutoffs = cutoffs;
        self
    }

    pub fn with_split(mut self, split: SplitStrategy) -> Self {
        self.split = split;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_load_options(mut self, load: LoadOptions) -> Self {
        self.load = load;
        self
    }

    /// Reject settings that would make metrics undefined
    pub fn validate(&self) -> Result<()> {
        if !self.min_rating.is_finite() {
            return Err(EvaluationError::InvalidConfig(format!(
                "min_rating must be finite, got {}",
                self.min_rating
            )));
        }
        if self.cutoffs.is_empty() {
            return Err(EvaluationError::InvalidConfig(
                "at least one cutoff is required".to_string(),
            ));
        }
        if self.cutoffs.contains(&0) {
            return Err(EvaluationError::InvalidConfig(
                "cutoffs must be positive".to_string(),
            ));
        }
        if self.fixed_pool_sizes.contains(&0) {
            return Err(EvaluationError::InvalidConfig(
                "pool sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
