//! # Evaluation Driver
//!
//! Runs the offline protocol for one fitted model:
//! 1. Filter the snapshot's interactions (positive, known stall, eligible user)
//! 2. Split each user's interactions into train and test halves
//! 3. Build the item universe: catalog stalls the scorer knows
//! 4. Per user and pool size: sample candidates, score, rank, measure
//! 5. Average per pool size and cutoff into the two result tables
//!
//! Users are evaluated in parallel. Each user draws from its own random
//! stream and results are aggregated in user order, so a run is
//! reproducible for a given seed regardless of scheduling.

use std::collections::HashSet;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use candidates::{InteractionSplit, NegativePool, UserSplit, pool_sizes, split_interactions, user_rng};
use data_loader::{Snapshot, StallId};
use pipeline::{FilterPipeline, FilterStage};
use scorers::Scorer;

use crate::config::EvaluationConfig;
use crate::error::{EvaluationError, Result};
use crate::metrics::{CutoffMetrics, MetricAccumulator, user_metrics};
use crate::ranker::rank;
use crate::tables::{HitRateTable, MetricsTable, PoolResult, build_tables};

/// Filtered and split interactions, reusable across models
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub stages: Vec<FilterStage>,
    pub split: InteractionSplit,
}

impl PreparedData {
    pub fn eligible_users(&self) -> usize {
        self.split.len()
    }
}

/// Counts describing one model run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub model: String,
    pub catalog_size: usize,
    pub universe_size: usize,
    pub pool_sizes: Vec<usize>,
    pub eligible_users: usize,
    pub users_evaluated: usize,
    pub users_unknown: usize,
    pub users_without_test: usize,
}

/// Everything one model run produces
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub hit_rate: HitRateTable,
    pub metrics: MetricsTable,
    pub summary: RunSummary,
}

/// Why a user contributed nothing
enum Skip {
    UnknownUser,
    NoScorableTest,
}

/// Metrics of one user, one entry per pool size
type UserOutcome = std::result::Result<Vec<Vec<CutoffMetrics>>, Skip>;

/// Runs the evaluation protocol for any [`Scorer`]
pub struct EvaluationDriver {
    config: EvaluationConfig,
    pipeline: FilterPipeline,
}

impl EvaluationDriver {
    pub fn new(config: EvaluationConfig) -> Self {
        let pipeline = FilterPipeline::standard(config.min_rating, config.min_interactions);
        Self { config, pipeline }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Filter and split the snapshot's interactions
    #[instrument(skip(self, snapshot))]
    pub fn prepare(&self, snapshot: &Snapshot) -> Result<PreparedData> {
        let (positives, stages) = self
            .pipeline
            .apply_with_stages(snapshot.interactions().to_vec(), snapshot)?;

        // The last stream is reserved for shuffling, user streams start at 0
        let mut rng = user_rng(self.config.seed, u64::MAX);
        let split = split_interactions(positives, self.config.split, &mut rng);

        info!(
            "Prepared {} eligible users ({} with a test half)",
            split.len(),
            split.users_with_test()
        );
        Ok(PreparedData { stages, split })
    }

    /// Prepare the snapshot and evaluate `scorer` on it
    pub fn run(&self, snapshot: &Snapshot, scorer: &dyn Scorer) -> Result<EvaluationReport> {
        let prepared = self.prepare(snapshot)?;
        self.run_prepared(snapshot, &prepared, scorer)
    }

    /// Evaluate `scorer` on already prepared data
    #[instrument(skip(self, snapshot, prepared, scorer), fields(model = scorer.name()))]
    pub fn run_prepared(
        &self,
        snapshot: &Snapshot,
        prepared: &PreparedData,
        scorer: &dyn Scorer,
    ) -> Result<EvaluationReport> {
        self.config.validate()?;
        let start_time = Instant::now();

        let universe = item_universe(snapshot, scorer)?;
        let sizes = pool_sizes(&self.config.fixed_pool_sizes, universe.len());
        info!(
            "Evaluating {} over {} stalls, pool sizes {:?}",
            scorer.name(),
            universe.len(),
            sizes
        );

        let universe_set: HashSet<&str> = universe.iter().map(String::as_str).collect();
        let users: Vec<&UserSplit> = prepared.split.iter().collect();

        let outcomes: Vec<UserOutcome> = users
            .par_iter()
            .enumerate()
            .map(|(index, user)| {
                self.evaluate_user(index as u64, user, &universe, &universe_set, &sizes, scorer)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut accumulators: Vec<MetricAccumulator> = sizes
            .iter()
            .map(|_| MetricAccumulator::new(self.config.cutoffs.len()))
            .collect();
        let mut users_unknown = 0;
        let mut users_without_test = 0;

        for outcome in &outcomes {
            match outcome {
                Ok(per_pool) => {
                    for (accumulator, metrics) in accumulators.iter_mut().zip(per_pool) {
                        accumulator.add(metrics);
                    }
                }
                Err(Skip::UnknownUser) => users_unknown += 1,
                Err(Skip::NoScorableTest) => users_without_test += 1,
            }
        }

        if users_unknown > 0 {
            warn!("Skipped {} users unknown to {}", users_unknown, scorer.name());
        }

        let pools: Vec<PoolResult> = sizes
            .iter()
            .zip(&accumulators)
            .map(|(&pool_size, accumulator)| PoolResult {
                pool_size,
                users: accumulator.users(),
                metrics: accumulator.mean(),
            })
            .collect();
        let (hit_rate, metrics) = build_tables(&self.config.cutoffs, pools);

        let summary = RunSummary {
            model: scorer.name().to_string(),
            catalog_size: snapshot.counts().0,
            universe_size: universe.len(),
            pool_sizes: sizes,
            eligible_users: users.len(),
            users_evaluated: outcomes.iter().filter(|outcome| outcome.is_ok()).count(),
            users_unknown,
            users_without_test,
        };

        info!(
            "Evaluated {} users for {} in {:.2?}",
            summary.users_evaluated,
            summary.model,
            start_time.elapsed()
        );
        Ok(EvaluationReport {
            hit_rate,
            metrics,
            summary,
        })
    }

    /// Sample, score, rank and measure one user at every pool size
    fn evaluate_user(
        &self,
        user_index: u64,
        user: &UserSplit,
        universe: &[StallId],
        universe_set: &HashSet<&str>,
        sizes: &[usize],
        scorer: &dyn Scorer,
    ) -> Result<UserOutcome> {
        if !scorer.knows_user(&user.user_id) {
            debug!("Skipping user {}: unknown to scorer", user.user_id);
            return Ok(Err(Skip::UnknownUser));
        }

        let test_items: Vec<StallId> = user
            .test_items()
            .into_iter()
            .filter(|stall_id| universe_set.contains(stall_id.as_str()))
            .collect();
        if test_items.is_empty() {
            return Ok(Err(Skip::NoScorableTest));
        }

        let negatives = NegativePool::new(universe, &user.train_items(), &test_items);
        let mut rng = user_rng(self.config.seed, user_index);

        let mut per_pool = Vec::with_capacity(sizes.len());
        for &pool_size in sizes {
            let candidates = negatives.draw(pool_size, &test_items, &mut rng);
            let scores = scorer.score(&user.user_id, &candidates)?;
            let ranked = rank(&candidates, &scores)?;
            per_pool.push(user_metrics(&ranked, &test_items, &self.config.cutoffs));
        }

        debug!(
            "User {}: {} test items, {} negatives available",
            user.user_id,
            test_items.len(),
            negatives.len()
        );
        Ok(Ok(per_pool))
    }
}

/// Catalog stalls the scorer can score, sorted
fn item_universe(snapshot: &Snapshot, scorer: &dyn Scorer) -> Result<Vec<StallId>> {
    let catalog = snapshot.stall_ids();
    let universe: Vec<StallId> = catalog
        .iter()
        .filter(|stall_id| scorer.knows_item(stall_id))
        .map(|stall_id| (*stall_id).clone())
        .collect();

    if universe.is_empty() {
        return Err(EvaluationError::NoScorableItems {
            model: scorer.name().to_string(),
            catalog: catalog.len(),
        });
    }
    if universe.len() < catalog.len() {
        warn!(
            "{} knows {} of {} catalog stalls",
            scorer.name(),
            universe.len(),
            catalog.len()
        );
    }
    Ok(universe)
}
