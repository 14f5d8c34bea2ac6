//! Fitted scorers for offline evaluation.
//!
//! Training happens outside this workspace. What comes back is a fitted
//! artifact that can score (user, stall) pairs, and the evaluation harness
//! only ever talks to it through the [`Scorer`] trait. Three model
//! families are supported:
//! - [`EmbeddingSimilarity`]: cosine similarity of content embeddings
//! - [`GraphConvolution`]: dot product of propagated user/item vectors
//! - [`FactorizationMachine`]: biases, side features and latent factors
//!
//! [`FittedModel`] loads any of them from a tagged JSON artifact.

pub mod embedding;
pub mod error;
pub mod factorization;
pub mod graph;
pub mod model;
pub mod vector;

use data_loader::StallId;

pub use embedding::EmbeddingSimilarity;
pub use error::{Result, ScoreError};
pub use factorization::FactorizationMachine;
pub use graph::GraphConvolution;
pub use model::FittedModel;

/// Anything that can rank stalls for a user.
///
/// ## Design Note
/// - `Send + Sync` so one scorer can serve every evaluation thread
/// - `score` returns one value per candidate, in candidate order
/// - Higher scores rank first; scores need not be normalised
pub trait Scorer: Send + Sync {
    /// Name used in logs and result file names
    fn name(&self) -> &str;

    fn knows_user(&self, user_id: &str) -> bool;

    fn knows_item(&self, stall_id: &str) -> bool;

    /// Score `candidates` for `user_id`.
    ///
    /// # Errors
    /// * `ScoreError::UnknownUser` - the user has no fitted representation
    /// * `ScoreError::UnknownItem` - a candidate has no fitted representation
    fn score(&self, user_id: &str, candidates: &[StallId]) -> Result<Vec<f32>>;
}
