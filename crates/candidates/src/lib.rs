//! # Candidates Crate
//!
//! Builds what each user is evaluated on: the train/test split of their
//! interactions and, per pool size, the candidate list the ranker sees.
//!
//! ## Components
//!
//! ### Interaction Splitter
//! Per-user partition of qualifying interactions:
//! - chronological (default): the newest half is held out
//! - shuffled: seeded shuffle before the cut
//!
//! ### Candidate Sampler
//! Test items plus negatives drawn without replacement from the stalls the
//! user has not interacted with, for each pool size in
//! [`pool::DEFAULT_POOL_SIZES`] and the full universe.
//!
//! ## Example Usage
//!
//! ```ignore
//! use candidates::{NegativePool, SplitStrategy, split_interactions, user_rng};
//!
//! let split = split_interactions(positives, SplitStrategy::Chronological, &mut user_rng(42, 0));
//! let user = split.get("alice").unwrap();
//! let pool = NegativePool::new(&universe, &user.train_items(), &user.test_items());
//! let candidates = pool.draw(100, &user.test_items(), &mut user_rng(42, 1));
//! ```

pub mod export;
pub mod pool;
pub mod sampler;
pub mod split;

// Re-export commonly used types
pub use export::{SplitFiles, write_split};
pub use pool::{DEFAULT_POOL_SIZES, pool_sizes};
pub use sampler::{NegativePool, negatives_needed, user_rng};
pub use split::{InteractionSplit, SplitStrategy, UserSplit, split_interactions, split_user};
