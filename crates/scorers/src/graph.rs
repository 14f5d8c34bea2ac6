//! Graph-convolution collaborative filtering scorer.
//!
//! Holds the final user and item vectors after embedding propagation over
//! the user-stall interaction graph. The score is their dot product.

use crate::error::{Result, ScoreError};
use crate::vector::{common_dimension, dot};
use crate::Scorer;
use data_loader::{StallId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_name() -> String {
    "ngcf".to_string()
}

/// Fitted graph-convolution model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConvolution {
    #[serde(default = "default_name")]
    pub name: String,
    pub user_vectors: HashMap<UserId, Vec<f32>>,
    pub item_vectors: HashMap<StallId, Vec<f32>>,
}

impl GraphConvolution {
    pub fn new(
        user_vectors: HashMap<UserId, Vec<f32>>,
        item_vectors: HashMap<StallId, Vec<f32>>,
    ) -> Self {
        Self {
            name: default_name(),
            user_vectors,
            item_vectors,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let dimension = common_dimension(&self.user_vectors, None, "user vector")?;
        common_dimension(&self.item_vectors, dimension, "item vector")?;
        Ok(())
    }
}

impl Scorer for GraphConvolution {
    fn name(&self) -> &str {
        &self.name
    }

    fn knows_user(&self, user_id: &str) -> bool {
        self.user_vectors.contains_key(user_id)
    }

    fn knows_item(&self, stall_id: &str) -> bool {
        self.item_vectors.contains_key(stall_id)
    }

    fn score(&self, user_id: &str, candidates: &[StallId]) -> Result<Vec<f32>> {
        let user = self
            .user_vectors
            .get(user_id)
            .ok_or_else(|| ScoreError::UnknownUser(user_id.to_string()))?;

        candidates
            .iter()
            .map(|stall_id| {
                self.item_vectors
                    .get(stall_id)
                    .map(|item| dot(user, item))
                    .ok_or_else(|| ScoreError::UnknownItem(stall_id.clone()))
            })
            .collect()
    }
}
