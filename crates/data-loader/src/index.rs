//! Snapshot building.
//!
//! Turns parsed stall and review records into a [`Snapshot`]:
//! - prepare the catalog (normalise names, drop non-food and unrated stalls)
//! - keep the first row of a repeated stall id
//! - resolve each review's timestamp
//! - drop reviews without a usable rating
//! - validate what is left

use crate::error::{DataLoadError, Result};
use crate::normalise::{is_non_food, normalise_text};
use crate::parser;
use crate::relative_time::{parse_relative_time, to_unix_seconds};
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

impl Snapshot {
    /// Load a snapshot directory holding `stalls` and `reviews` files.
    ///
    /// The two files are parsed in parallel; both must parse for the load to
    /// succeed.
    pub fn load_from_files(data_dir: &Path, options: &LoadOptions) -> Result<Self> {
        info!("Loading snapshot from {}", data_dir.display());

        let stalls_path = parser::locate(data_dir, "stalls")?;
        let reviews_path = parser::locate(data_dir, "reviews")?;

        let (stalls, reviews) = rayon::join(
            || parser::parse_stalls(&stalls_path),
            || parser::parse_reviews(&reviews_path),
        );
        let stalls = stalls?;
        let reviews = reviews?;

        info!("Parsed {} stalls and {} reviews", stalls.len(), reviews.len());

        Self::from_records(stalls, reviews, options)
    }

    /// Build a snapshot from already parsed records
    pub fn from_records(
        stalls: Vec<Stall>,
        reviews: Vec<Review>,
        options: &LoadOptions,
    ) -> Result<Self> {
        let mut snapshot = Snapshot::new();
        snapshot.report.stalls_read = stalls.len();
        snapshot.report.reviews_read = reviews.len();

        let mut seen: HashSet<StallId> = HashSet::with_capacity(stalls.len());
        for stall in stalls {
            if !seen.insert(stall.stall_id.clone()) {
                debug!("Ignoring repeated row for stall {}", stall.stall_id);
                snapshot.report.stalls_duplicate += 1;
                continue;
            }
            snapshot.admit_stall(stall, options);
        }

        // One place can be scraped under several centres sharing a postal code
        if snapshot.report.stalls_duplicate > 0 {
            warn!(
                "Ignored {} repeated stall rows",
                snapshot.report.stalls_duplicate
            );
        }

        for review in reviews {
            match review_to_interaction(review, options) {
                Some(interaction) => snapshot.insert_interaction(interaction),
                None => snapshot.report.reviews_missing_rating += 1,
            }
        }

        if snapshot.report.reviews_missing_rating > 0 {
            warn!(
                "Dropped {} reviews without a usable rating",
                snapshot.report.reviews_missing_rating
            );
        }

        snapshot.validate()?;

        let (stalls, interactions) = snapshot.counts();
        info!(
            "Snapshot ready: {} stalls ({} excluded), {} interactions",
            stalls,
            snapshot.report.stalls_excluded(),
            interactions
        );
        Ok(snapshot)
    }

    /// Normalise a stall and add it to the catalog unless it is excluded
    fn admit_stall(&mut self, mut stall: Stall, options: &LoadOptions) {
        stall.name_norm = normalise_text(&stall.name);
        stall.address_norm = normalise_text(&stall.address);

        if options.exclude_non_food && is_non_food(&stall.name_norm) {
            debug!("Excluding non-food stall {} ({})", stall.stall_id, stall.name);
            self.report.stalls_non_food += 1;
            return;
        }
        if options.require_stall_rating && stall.rating.is_none() {
            debug!("Excluding unrated stall {}", stall.stall_id);
            self.report.stalls_unrated += 1;
            return;
        }

        self.insert_stall(stall);
    }

    /// Check the snapshot is usable for evaluation.
    ///
    /// An empty catalog is an error rather than an empty result, since
    /// every metric computed from it would be meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.stalls.is_empty() {
            return Err(DataLoadError::EmptyCatalog {
                read: self.report.stalls_read,
                excluded: self.report.stalls_excluded(),
            });
        }

        for interaction in &self.interactions {
            if !interaction.rating.is_finite() {
                return Err(DataLoadError::InvalidValue {
                    field: "rating".to_string(),
                    value: interaction.rating.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Resolve one review into an interaction; `None` when it has no rating
fn review_to_interaction(review: Review, options: &LoadOptions) -> Option<Interaction> {
    let rating = review.rating?;
    let timestamp = review.timestamp.unwrap_or_else(|| {
        to_unix_seconds(parse_relative_time(
            review.relative_time.as_deref(),
            options.reference_date,
        ))
    });

    Some(Interaction {
        user_id: review.author,
        stall_id: review.stall_id,
        rating,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stall(id: &str, name: &str, rating: Option<f32>) -> Stall {
        Stall {
            stall_id: id.to_string(),
            name: name.to_string(),
            address: "1 Kadayanallur St".to_string(),
            centre_id: None,
            rating,
            business_status: None,
            name_norm: String::new(),
            address_norm: String::new(),
        }
    }

    fn review(author: &str, stall_id: &str, rating: Option<f32>, when: &str) -> Review {
        Review {
            author: author.to_string(),
            stall_id: stall_id.to_string(),
            rating,
            relative_time: Some(when.to_string()),
            timestamp: None,
            review_text: None,
        }
    }

    #[test]
    fn test_catalog_preparation() {
        let stalls = vec![
            stall("s1", "Tian Tian Chicken Rice", Some(4.3)),
            stall("s2", "POSB ATM", Some(3.0)),
            stall("s3", "Hokkien Mee", None),
        ];

        let snapshot = Snapshot::from_records(stalls, vec![], &LoadOptions::default()).unwrap();

        assert_eq!(snapshot.counts(), (1, 0));
        assert_eq!(snapshot.get_stall("s1").unwrap().name_norm, "tian tian chicken rice");
        assert_eq!(snapshot.report().stalls_non_food, 1);
        assert_eq!(snapshot.report().stalls_unrated, 1);
    }

    #[test]
    fn test_exclusions_can_be_disabled() {
        let stalls = vec![
            stall("s1", "POSB ATM", Some(3.0)),
            stall("s2", "Hokkien Mee", None),
        ];
        let options = LoadOptions::default()
            .with_exclude_non_food(false)
            .with_require_stall_rating(false);

        let snapshot = Snapshot::from_records(stalls, vec![], &options).unwrap();
        assert_eq!(snapshot.counts(), (2, 0));
    }

    #[test]
    fn test_reviews_resolved_and_filtered() {
        let stalls = vec![stall("s1", "Chicken Rice", Some(4.0))];
        let reviews = vec![
            review("alice", "s1", Some(5.0), "2 days ago"),
            review("bob", "s1", None, "a month ago"),
        ];
        let options = LoadOptions::default()
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 4, 27).unwrap());

        let snapshot = Snapshot::from_records(stalls, reviews, &options).unwrap();

        assert_eq!(snapshot.counts(), (1, 1));
        assert_eq!(snapshot.report().reviews_missing_rating, 1);

        let alice = &snapshot.interactions()[0];
        let expected = to_unix_seconds(NaiveDate::from_ymd_opt(2025, 4, 25).unwrap());
        assert_eq!(alice.timestamp, expected);
    }

    #[test]
    fn test_explicit_timestamp_wins() {
        let stalls = vec![stall("s1", "Chicken Rice", Some(4.0))];
        let mut with_ts = review("alice", "s1", Some(4.0), "3 years ago");
        with_ts.timestamp = Some(42);

        let snapshot =
            Snapshot::from_records(stalls, vec![with_ts], &LoadOptions::default()).unwrap();
        assert_eq!(snapshot.interactions()[0].timestamp, 42);
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let stalls = vec![stall("s1", "NTUC FairPrice", Some(4.0))];
        let err = Snapshot::from_records(stalls, vec![], &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataLoadError::EmptyCatalog { read: 1, excluded: 1 }));
    }

    #[test]
    fn test_repeated_stall_keeps_first_row() {
        let mut second = stall("s1", "Chicken Rice", Some(3.5));
        second.centre_id = Some("c2".to_string());
        let stalls = vec![stall("s1", "Chicken Rice", Some(4.0)), second];

        let snapshot = Snapshot::from_records(stalls, vec![], &LoadOptions::default()).unwrap();
        assert_eq!(snapshot.counts(), (1, 0));
        assert_eq!(snapshot.get_stall("s1").unwrap().rating, Some(4.0));
        assert_eq!(snapshot.report().stalls_duplicate, 1);
    }

    #[test]
    fn test_repeated_row_of_excluded_stall_stays_excluded() {
        let stalls = vec![
            stall("s1", "Hokkien Mee", None),
            stall("s1", "Hokkien Mee", Some(4.0)),
        ];
        let err = Snapshot::from_records(stalls, vec![], &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataLoadError::EmptyCatalog { read: 2, excluded: 1 }));
    }

    #[test]
    fn test_load_with_repeated_stall_rows() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stalls.csv"),
            "stall_id,name,address,hawker_centre_id,rating\n\
             s1,Laksa,Block 1,c1,4.1\n\
             s1,Laksa,Block 1,c2,4.1\n\
             s2,Satay,Block 2,c2,3.9\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("reviews.json"), "[]").unwrap();

        let snapshot = Snapshot::load_from_files(dir.path(), &LoadOptions::default()).unwrap();
        assert_eq!(snapshot.stall_ids(), vec!["s1", "s2"]);
        assert_eq!(snapshot.report().stalls_duplicate, 1);
        assert_eq!(
            snapshot.get_stall("s1").unwrap().centre_id.as_deref(),
            Some("c1"),
            "First row should win"
        );
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stalls.csv"),
            "stall_id,name,address,rating\ns1,Laksa,Block 1,4.1\ns2,Satay,Block 2,3.9\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("reviews.json"),
            r#"[{"author":"alice","place_id":"s1","rating":5,"relative_time":"a week ago"}]"#,
        )
        .unwrap();

        let snapshot = Snapshot::load_from_files(dir.path(), &LoadOptions::default()).unwrap();
        assert_eq!(snapshot.counts(), (2, 1));
        assert_eq!(snapshot.stall_ids(), vec!["s1", "s2"]);
    }
}
