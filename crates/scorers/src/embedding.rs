//! Content-embedding similarity scorer.
//!
//! Each stall has a sentence embedding of its review text; each user has a
//! profile vector built from their train half. The score is the cosine
//! similarity between the two.

use crate::error::{Result, ScoreError};
use crate::vector::{common_dimension, cosine};
use crate::Scorer;
use data_loader::{StallId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_name() -> String {
    "bert".to_string()
}

/// Fitted embedding-similarity model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSimilarity {
    #[serde(default = "default_name")]
    pub name: String,
    pub user_profiles: HashMap<UserId, Vec<f32>>,
    pub item_embeddings: HashMap<StallId, Vec<f32>>,
}

impl EmbeddingSimilarity {
    pub fn new(
        user_profiles: HashMap<UserId, Vec<f32>>,
        item_embeddings: HashMap<StallId, Vec<f32>>,
    ) -> Self {
        Self {
            name: default_name(),
            user_profiles,
            item_embeddings,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Profiles and embeddings must share one dimension
    pub fn validate(&self) -> Result<()> {
        let dimension = common_dimension(&self.user_profiles, None, "user profile")?;
        common_dimension(&self.item_embeddings, dimension, "item embedding")?;
        Ok(())
    }
}

impl Scorer for EmbeddingSimilarity {
    fn name(&self) -> &str {
        &self.name
    }

    fn knows_user(&self, user_id: &str) -> bool {
        self.user_profiles.contains_key(user_id)
    }

    fn knows_item(&self, stall_id: &str) -> bool {
        self.item_embeddings.contains_key(stall_id)
    }

    fn score(&self, user_id: &str, candidates: &[StallId]) -> Result<Vec<f32>> {
        let profile = self
            .user_profiles
            .get(user_id)
            .ok_or_else(|| ScoreError::UnknownUser(user_id.to_string()))?;

        candidates
            .iter()
            .map(|stall_id| {
                self.item_embeddings
                    .get(stall_id)
                    .map(|embedding| cosine(profile, embedding))
                    .ok_or_else(|| ScoreError::UnknownItem(stall_id.clone()))
            })
            .collect()
    }
}
