//! Filter implementations for the interaction pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod eligible_user;
pub mod known_stall;
pub mod minimum_rating;

// Re-export for convenience
pub use eligible_user::EligibleUserFilter;
pub use known_stall::KnownStallFilter;
pub use minimum_rating::MinimumRatingFilter;
