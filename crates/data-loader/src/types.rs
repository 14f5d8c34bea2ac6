//! Core domain types for a hawker-centre data snapshot.
//!
//! A snapshot is what the document store held at evaluation time: the stall
//! catalog and the scraped Google Maps reviews. Raw rows are deserialised
//! into [`Stall`] and [`Review`]; reviews that carry a usable rating become
//! [`Interaction`]s, the unit every later stage works with.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Review author, used as the user identifier
pub type UserId = String;

/// Google place id of a stall
pub type StallId = String;

// =============================================================================
// Stall
// =============================================================================

/// A stall in the catalog.
///
/// `name_norm` and `address_norm` are derived after parsing, see
/// [`crate::normalise::normalise_text`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stall {
    #[serde(alias = "place_id")]
    pub stall_id: StallId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub address: String,
    #[serde(default, alias = "hawker_centre_id")]
    pub centre_id: Option<String>,
    /// Google rating of the stall itself, not of any single review
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub business_status: Option<String>,
    #[serde(skip_deserializing)]
    pub name_norm: String,
    #[serde(skip_deserializing)]
    pub address_norm: String,
}

// =============================================================================
// Reviews and Interactions
// =============================================================================

/// A raw review row as scraped.
///
/// Any field but the two identifiers may be missing. `relative_time` is the
/// "3 months ago" text shown by Google Maps; `timestamp` is only present
/// when an exporter already resolved it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(alias = "user_id")]
    pub author: UserId,
    #[serde(alias = "place_id")]
    pub stall_id: StallId,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub relative_time: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub review_text: Option<String>,
}

/// A rated user-stall interaction.
///
/// Small and cheap to clone; the timestamp is in unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub stall_id: StallId,
    pub rating: f32,
    pub timestamp: i64,
}

// =============================================================================
// Loading Options and Report
// =============================================================================

/// Knobs for catalog preparation and recency derivation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Date that relative review times ("2 weeks ago") are anchored to
    pub reference_date: NaiveDate,
    /// Drop stalls whose normalised name hits the non-food keyword list
    pub exclude_non_food: bool,
    /// Drop stalls that have no Google rating
    pub require_stall_rating: bool,
}

impl LoadOptions {
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    pub fn with_exclude_non_food(mut self, exclude: bool) -> Self {
        self.exclude_non_food = exclude;
        self
    }

    pub fn with_require_stall_rating(mut self, require: bool) -> Self {
        self.require_stall_rating = require;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            reference_date: crate::relative_time::default_reference_date(),
            exclude_non_food: true,
            require_stall_rating: true,
        }
    }
}

/// Counters collected while building a [`Snapshot`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub stalls_read: usize,
    pub stalls_non_food: usize,
    pub stalls_unrated: usize,
    /// Repeated rows of an already seen stall id
    pub stalls_duplicate: usize,
    pub reviews_read: usize,
    pub reviews_missing_rating: usize,
}

impl LoadReport {
    pub fn stalls_excluded(&self) -> usize {
        self.stalls_non_food + self.stalls_unrated
    }
}

// =============================================================================
// Snapshot - stalls plus interactions
// =============================================================================

/// The in-memory view of one evaluation snapshot.
///
/// Holds the prepared stall catalog and every interaction that had a rating.
/// Interactions are kept even when they point at stalls outside the catalog;
/// dropping those is a pipeline filter's job.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub(crate) stalls: HashMap<StallId, Stall>,
    pub(crate) interactions: Vec<Interaction>,
    pub(crate) report: LoadReport,
}

impl Snapshot {
    /// Creates a new, empty Snapshot
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_stall(&self, stall_id: &str) -> Option<&Stall> {
        self.stalls.get(stall_id)
    }

    pub fn contains_stall(&self, stall_id: &str) -> bool {
        self.stalls.contains_key(stall_id)
    }

    /// Catalog stall ids in sorted order
    pub fn stall_ids(&self) -> Vec<&StallId> {
        let mut ids: Vec<&StallId> = self.stalls.keys().collect();
        ids.sort_unstable();
        ids
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// All interactions of one user, in load order
    pub fn user_interactions(&self, user_id: &str) -> Vec<&Interaction> {
        self.interactions
            .iter()
            .filter(|interaction| interaction.user_id == user_id)
            .collect()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn insert_stall(&mut self, stall: Stall) {
        self.stalls.insert(stall.stall_id.clone(), stall);
    }

    pub fn insert_interaction(&mut self, interaction: Interaction) {
        self.interactions.push(interaction);
    }

    /// (stalls, interactions)
    pub fn counts(&self) -> (usize, usize) {
        (self.stalls.len(), self.interactions.len())
    }
}

// =============================================================================
// Serde helpers
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRating {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Accepts `4`, `4.5`, `"4"`, `"4 stars"`, empty or null.
///
/// Anything that does not yield a finite number becomes `None`, so one
/// garbled scrape does not fail the whole file.
fn lenient_rating<'de, D>(deserializer: D) -> std::result::Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawRating> = Option::deserialize(deserializer)?;
    let value = match raw {
        Some(RawRating::Number(n)) => Some(n as f32),
        Some(RawRating::Text(text)) => text
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<f32>().ok()),
        Some(RawRating::Other(_)) | None => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
