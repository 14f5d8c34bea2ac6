//! Pipeline for filtering the interaction log before evaluation.
//!
//! This crate provides:
//! - Filter trait and implementations for interaction filtering
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! The standard pipeline narrows the snapshot's interactions in stages:
//! 1. MinimumRatingFilter keeps positive interactions only
//! 2. KnownStallFilter drops interactions with stalls outside the catalog
//! 3. EligibleUserFilter keeps users with enough remaining interactions
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//!
//! let pipeline = FilterPipeline::standard(4.0, 10);
//! let positives = pipeline.apply(snapshot.interactions().to_vec(), &snapshot)?;
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use filter_pipeline::{FilterPipeline, FilterStage};
pub use traits::Filter;
