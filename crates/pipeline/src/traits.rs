//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to the interaction log.

use anyhow::Result;
use data_loader::{Interaction, Snapshot};

/// Core trait for filtering interactions.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across evaluation runs
/// - Filters take ownership of the Vec<Interaction> and return a filtered Vec
/// - The snapshot is read-only context (catalog lookups)
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of interactions.
    ///
    /// Empty input must yield empty output, never an error.
    fn apply(
        &self,
        interactions: Vec<Interaction>,
        snapshot: &Snapshot,
    ) -> Result<Vec<Interaction>>;
}
