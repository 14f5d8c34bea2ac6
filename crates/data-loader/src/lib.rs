//! # Data Loader Crate
//!
//! Loads a hawker-centre snapshot (stall catalog plus scraped reviews) and
//! prepares it for offline evaluation.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Stall, Review, Interaction, Snapshot)
//! - **parser**: Parse CSV or JSON exports into Rust structs
//! - **index**: Build a validated [`Snapshot`] from parsed records
//! - **normalise**: Name normalisation and the non-food exclusion list
//! - **relative_time**: Resolve "3 months ago" into dates
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{LoadOptions, Snapshot};
//! use std::path::Path;
//!
//! let snapshot = Snapshot::load_from_files(Path::new("data/snapshot"), &LoadOptions::default())?;
//! let (stalls, interactions) = snapshot.counts();
//! println!("{} stalls, {} interactions", stalls, interactions);
//! ```

pub mod error;
pub mod index;
pub mod normalise;
pub mod parser;
pub mod relative_time;
pub mod types;

pub use error::{DataLoadError, Result};
pub use normalise::{is_non_food, normalise_text};
pub use relative_time::{default_reference_date, parse_relative_time};
pub use types::{
    // Type aliases
    StallId,
    UserId,
    // Core types
    Interaction,
    Review,
    Snapshot,
    Stall,
    // Loading
    LoadOptions,
    LoadReport,
};
