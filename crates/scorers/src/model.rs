//! Loading fitted model artifacts.
//!
//! An artifact is one JSON document whose `kind` field selects the model
//! family:
//!
//! ```json
//! { "kind": "graph_convolution", "name": "ngcf",
//!   "user_vectors": { "alice": [0.1, 0.2] },
//!   "item_vectors": { "ChIJ...": [0.3, 0.4] } }
//! ```

use crate::embedding::EmbeddingSimilarity;
use crate::error::{Result, ScoreError};
use crate::factorization::FactorizationMachine;
use crate::graph::GraphConvolution;
use crate::Scorer;
use data_loader::StallId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Any of the supported fitted models
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedModel {
    EmbeddingSimilarity(EmbeddingSimilarity),
    GraphConvolution(GraphConvolution),
    FactorizationMachine(FactorizationMachine),
}

impl FittedModel {
    /// Read and validate an artifact file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ScoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model: FittedModel = serde_json::from_reader(BufReader::new(file))?;
        model.validate()?;

        info!(
            "Loaded {} model '{}' from {}",
            model.kind(),
            model.name(),
            path.display()
        );
        Ok(model)
    }

    /// Parse and validate an artifact held in memory
    pub fn from_json_str(json: &str) -> Result<Self> {
        let model: FittedModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FittedModel::EmbeddingSimilarity(_) => "embedding_similarity",
            FittedModel::GraphConvolution(_) => "graph_convolution",
            FittedModel::FactorizationMachine(_) => "factorization_machine",
        }
    }

    /// Check the name is usable as a file name and the vectors agree in length
    pub fn validate(&self) -> Result<()> {
        validate_name(self.name())?;
        match self {
            FittedModel::EmbeddingSimilarity(model) => model.validate(),
            FittedModel::GraphConvolution(model) => model.validate(),
            FittedModel::FactorizationMachine(model) => model.validate(),
        }
    }

    fn inner(&self) -> &dyn Scorer {
        match self {
            FittedModel::EmbeddingSimilarity(model) => model,
            FittedModel::GraphConvolution(model) => model,
            FittedModel::FactorizationMachine(model) => model,
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(ScoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl Scorer for FittedModel {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn knows_user(&self, user_id: &str) -> bool {
        self.inner().knows_user(user_id)
    }

    fn knows_item(&self, stall_id: &str) -> bool {
        self.inner().knows_item(stall_id)
    }

    fn score(&self, user_id: &str, candidates: &[StallId]) -> Result<Vec<f32>> {
        self.inner().score(user_id, candidates)
    }
}

impl From<EmbeddingSimilarity> for FittedModel {
    fn from(model: EmbeddingSimilarity) -> Self {
        FittedModel::EmbeddingSimilarity(model)
    }
}

impl From<GraphConvolution> for FittedModel {
    fn from(model: GraphConvolution) -> Self {
        FittedModel::GraphConvolution(model)
    }
}

impl From<FactorizationMachine> for FittedModel {
    fn from(model: FactorizationMachine) -> Self {
        FittedModel::FactorizationMachine(model)
    }
}
