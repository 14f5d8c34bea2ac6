//! Interaction Splitter - per-user train/test partition
//!
//! Each eligible user's qualifying interactions are cut in two: the older
//! half is what a model may train on, the newer half is hidden and becomes
//! the test set the ranking is judged against.
//!
//! ## Algorithm
//! 1. Group interactions by user (sorted by user id)
//! 2. Order each user's interactions per [`SplitStrategy`]
//! 3. The last floor(n/2) interactions go to test, the rest to train
//!
//! With an odd count train gets the extra interaction, so a single
//! interaction gives train 1, test 0 and the user contributes no metric.

use data_loader::{Interaction, StallId, UserId};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// How a user's interactions are ordered before the cut
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Stable sort by timestamp; the most recent half is held out
    #[default]
    Chronological,
    /// Seeded uniform shuffle before the cut
    Shuffled,
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitStrategy::Chronological => write!(f, "chronological"),
            SplitStrategy::Shuffled => write!(f, "shuffled"),
        }
    }
}

impl FromStr for SplitStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chronological" => Ok(SplitStrategy::Chronological),
            "shuffled" => Ok(SplitStrategy::Shuffled),
            other => Err(format!(
                "unknown split strategy '{}', expected chronological or shuffled",
                other
            )),
        }
    }
}

/// One user's partition
#[derive(Debug, Clone, PartialEq)]
pub struct UserSplit {
    pub user_id: UserId,
    pub train: Vec<Interaction>,
    pub test: Vec<Interaction>,
}

impl UserSplit {
    /// Distinct train stall ids, first occurrence order
    pub fn train_items(&self) -> Vec<StallId> {
        distinct_stalls(&self.train)
    }

    /// Distinct test stall ids, first occurrence order
    pub fn test_items(&self) -> Vec<StallId> {
        distinct_stalls(&self.test)
    }

    pub fn has_test(&self) -> bool {
        !self.test.is_empty()
    }
}

fn distinct_stalls(interactions: &[Interaction]) -> Vec<StallId> {
    let mut seen = HashSet::new();
    interactions
        .iter()
        .filter(|interaction| seen.insert(interaction.stall_id.as_str()))
        .map(|interaction| interaction.stall_id.clone())
        .collect()
}

/// Partitions of every split user, keyed and iterated in user id order
#[derive(Debug, Clone, Default)]
pub struct InteractionSplit {
    users: BTreeMap<UserId, UserSplit>,
}

impl InteractionSplit {
    pub fn get(&self, user_id: &str) -> Option<&UserSplit> {
        self.users.get(user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserSplit> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Users with at least one test interaction
    pub fn users_with_test(&self) -> usize {
        self.iter().filter(|split| split.has_test()).count()
    }

    /// Every train interaction, user by user
    pub fn train_interactions(&self) -> impl Iterator<Item = &Interaction> {
        self.iter().flat_map(|split| split.train.iter())
    }

    /// Every test interaction, user by user
    pub fn test_interactions(&self) -> impl Iterator<Item = &Interaction> {
        self.iter().flat_map(|split| split.test.iter())
    }
}

/// Split a user's interactions; `None` when there are none.
pub fn split_user<R: Rng + ?Sized>(
    user_id: UserId,
    mut interactions: Vec<Interaction>,
    strategy: SplitStrategy,
    rng: &mut R,
) -> Option<UserSplit> {
    if interactions.is_empty() {
        return None;
    }

    match strategy {
        // sort_by_key is stable, equal timestamps keep input order
        SplitStrategy::Chronological => interactions.sort_by_key(|interaction| interaction.timestamp),
        SplitStrategy::Shuffled => interactions.shuffle(rng),
    }

    let test_len = interactions.len() / 2;
    let cut = interactions.len() - test_len;
    let test = interactions.split_off(cut);

    Some(UserSplit {
        user_id,
        train: interactions,
        test,
    })
}

/// Split every user's interactions.
///
/// Users are visited in sorted order, so a shuffled split consumes `rng`
/// deterministically for a given input.
#[instrument(skip(interactions, rng), fields(count = interactions.len()))]
pub fn split_interactions<R: Rng + ?Sized>(
    interactions: Vec<Interaction>,
    strategy: SplitStrategy,
    rng: &mut R,
) -> InteractionSplit {
    let mut by_user: BTreeMap<UserId, Vec<Interaction>> = BTreeMap::new();
    for interaction in interactions {
        by_user
            .entry(interaction.user_id.clone())
            .or_default()
            .push(interaction);
    }

    let users: BTreeMap<UserId, UserSplit> = by_user
        .into_iter()
        .filter_map(|(user_id, history)| {
            split_user(user_id.clone(), history, strategy, &mut *rng).map(|split| (user_id, split))
        })
        .collect();

    let split = InteractionSplit { users };
    debug!(
        "Split {} users ({} with a test half) using {} ordering",
        split.len(),
        split.users_with_test(),
        strategy
    );
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn at(user: &str, stall: &str, timestamp: i64) -> Interaction {
        Interaction {
            user_id: user.to_string(),
            stall_id: stall.to_string(),
            rating: 5.0,
            timestamp,
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_chronological_cut() {
        let history = vec![at("u", "c", 30), at("u", "a", 10), at("u", "d", 40), at("u", "b", 20)];
        let split = split_user("u".to_string(), history, SplitStrategy::Chronological, &mut rng())
            .unwrap();

        assert_eq!(split.train_items(), vec!["a", "b"]);
        assert_eq!(split.test_items(), vec!["c", "d"]);
    }

    #[test]
    fn test_odd_count_favours_train() {
        let history: Vec<Interaction> = (0..5).map(|t| at("u", &format!("s{}", t), t)).collect();
        let split = split_user("u".to_string(), history, SplitStrategy::Chronological, &mut rng())
            .unwrap();

        assert_eq!(split.train.len(), 3);
        assert_eq!(split.test.len(), 2);
    }

    #[test]
    fn test_single_interaction_has_no_test() {
        let split = split_user(
            "u".to_string(),
            vec![at("u", "s1", 0)],
            SplitStrategy::Chronological,
            &mut rng(),
        )
        .unwrap();

        assert_eq!(split.train.len(), 1);
        assert!(!split.has_test());
    }

    #[test]
    fn test_no_interactions_gives_nothing() {
        assert!(split_user("u".to_string(), vec![], SplitStrategy::Shuffled, &mut rng()).is_none());
        assert!(split_interactions(vec![], SplitStrategy::Chronological, &mut rng()).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let history = vec![at("u", "x", 5), at("u", "y", 5), at("u", "z", 5), at("u", "w", 5)];
        let split = split_user("u".to_string(), history, SplitStrategy::Chronological, &mut rng())
            .unwrap();

        assert_eq!(split.train_items(), vec!["x", "y"]);
        assert_eq!(split.test_items(), vec!["z", "w"]);
    }

    #[test]
    fn test_partition_is_disjoint_and_complete() {
        let mut interactions = Vec::new();
        for user in ["alice", "bob", "carol"] {
            for t in 0..11 {
                interactions.push(at(user, &format!("{}-{}", user, t), t));
            }
        }

        for strategy in [SplitStrategy::Chronological, SplitStrategy::Shuffled] {
            let split = split_interactions(interactions.clone(), strategy, &mut rng());
            assert_eq!(split.len(), 3);

            for user_split in split.iter() {
                let train: HashSet<StallId> = user_split.train_items().into_iter().collect();
                let test: HashSet<StallId> = user_split.test_items().into_iter().collect();
                assert!(train.is_disjoint(&test));
                assert_eq!(train.len() + test.len(), 11);
                assert_eq!(test.len(), 5);
            }
        }
    }

    #[test]
    fn test_shuffled_is_seeded() {
        let interactions: Vec<Interaction> =
            (0..20).map(|t| at("u", &format!("s{}", t), t)).collect();

        let first = split_interactions(interactions.clone(), SplitStrategy::Shuffled, &mut rng());
        let second = split_interactions(interactions, SplitStrategy::Shuffled, &mut rng());
        assert_eq!(first.get("u"), second.get("u"));
    }

    #[test]
    fn test_users_iterate_sorted() {
        let interactions = vec![at("zed", "s1", 0), at("amy", "s2", 0), at("max", "s3", 0)];
        let split = split_interactions(interactions, SplitStrategy::Chronological, &mut rng());

        let users: Vec<&str> = split.iter().map(|s| s.user_id.as_str()).collect();
        assert_eq!(users, vec!["amy", "max", "zed"]);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("Shuffled".parse::<SplitStrategy>(), Ok(SplitStrategy::Shuffled));
        assert_eq!(SplitStrategy::default().to_string(), "chronological");
        assert!("random".parse::<SplitStrategy>().is_err());
    }
}
