//! Factorization-machine collaborative filtering scorer.
//!
//! Scores the linear and pairwise parts of a fitted factorization machine
//! over (user, stall, stall side features):
//!
//! ```text
//! score = global_bias + user_bias[u] + item_bias[i]
//!       + <side_weights, item_side[i]>
//!       + <user_factors[u], item_factors[i]>
//! ```
//!
//! Missing biases and missing side features count as zero. A user or item
//! is known when it has latent factors.

use crate::error::{Result, ScoreError};
use crate::vector::{common_dimension, dot};
use crate::Scorer;
use data_loader::{StallId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_name() -> String {
    "deepfm".to_string()
}

/// Fitted factorization-machine model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactorizationMachine {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub global_bias: f32,
    #[serde(default)]
    pub user_bias: HashMap<UserId, f32>,
    #[serde(default)]
    pub item_bias: HashMap<StallId, f32>,
    pub user_factors: HashMap<UserId, Vec<f32>>,
    pub item_factors: HashMap<StallId, Vec<f32>>,
    /// Weights of the per-stall side features (e.g. Google rating)
    #[serde(default)]
    pub side_weights: Vec<f32>,
    #[serde(default)]
    pub item_side: HashMap<StallId, Vec<f32>>,
}

impl FactorizationMachine {
    pub fn new(
        user_factors: HashMap<UserId, Vec<f32>>,
        item_factors: HashMap<StallId, Vec<f32>>,
    ) -> Self {
        Self {
            name: default_name(),
            user_factors,
            item_factors,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_global_bias(mut self, bias: f32) -> Self {
        self.global_bias = bias;
        self
    }

    pub fn with_user_bias(mut self, user_bias: HashMap<UserId, f32>) -> Self {
        self.user_bias = user_bias;
        self
    }

    pub fn with_item_bias(mut self, item_bias: HashMap<StallId, f32>) -> Self {
        self.item_bias = item_bias;
        self
    }

    pub fn with_side_features(
        mut self,
        side_weights: Vec<f32>,
        item_side: HashMap<StallId, Vec<f32>>,
    ) -> Self {
        self.side_weights = side_weights;
        self.item_side = item_side;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let dimension = common_dimension(&self.user_factors, None, "user factors")?;
        common_dimension(&self.item_factors, dimension, "item factors")?;
        common_dimension(&self.item_side, Some(self.side_weights.len()), "item side features")?;
        Ok(())
    }

    fn score_one(&self, user_id: &str, user_factors: &[f32], stall_id: &str) -> Result<f32> {
        let item_factors = self
            .item_factors
            .get(stall_id)
            .ok_or_else(|| ScoreError::UnknownItem(stall_id.to_string()))?;

        let linear = self.global_bias
            + self.user_bias.get(user_id).copied().unwrap_or(0.0)
            + self.item_bias.get(stall_id).copied().unwrap_or(0.0);
        let side = self
            .item_side
            .get(stall_id)
            .map(|features| dot(&self.side_weights, features))
            .unwrap_or(0.0);

        Ok(linear + side + dot(user_factors, item_factors))
    }
}

impl Scorer for FactorizationMachine {
    fn name(&self) -> &str {
        &self.name
    }

    fn knows_user(&self, user_id: &str) -> bool {
        self.user_factors.contains_key(user_id)
    }

    fn knows_item(&self, stall_id: &str) -> bool {
        self.item_factors.contains_key(stall_id)
    }

    fn score(&self, user_id: &str, candidates: &[StallId]) -> Result<Vec<f32>> {
        let user_factors = self
            .user_factors
            .get(user_id)
            .ok_or_else(|| ScoreError::UnknownUser(user_id.to_string()))?;

        candidates
            .iter()
            .map(|stall_id| self.score_one(user_id, user_factors, stall_id))
            .collect()
    }
}
