//! Metric Aggregator - ranking metrics at cutoff k.
//!
//! For one user and one ranked candidate list, with tp = number of test
//! items in the top k:
//! - hit@k = 1 if tp > 0 else 0
//! - precision@k = tp / k
//! - recall@k = tp / |test|
//! - f1@k = 2pr / (p + r), or 0 when p + r = 0
//!
//! Users are then averaged per (pool size, k). Only users with a non-empty
//! test set are ever added, so an empty test set never counts as a zero.

use data_loader::StallId;
use serde::Serialize;
use std::collections::HashSet;

/// Metrics of one user at one cutoff, or their mean over users
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CutoffMetrics {
    pub hit_rate: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl CutoffMetrics {
    /// Metrics of `ranked` against `test_items` at cutoff `k`.
    ///
    /// `test_items` must be non-empty and `k` positive.
    pub fn at(ranked: &[StallId], test_items: &HashSet<&str>, k: usize) -> Self {
        let true_positives = ranked
            .iter()
            .take(k)
            .filter(|stall_id| test_items.contains(stall_id.as_str()))
            .count() as f64;

        let precision = true_positives / k as f64;
        let recall = true_positives / test_items.len() as f64;
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            hit_rate: if true_positives > 0.0 { 1.0 } else { 0.0 },
            precision,
            recall,
            f1,
        }
    }
}

/// Metrics of one ranked list at every cutoff, in cutoff order
pub fn user_metrics(ranked: &[StallId], test_items: &[StallId], cutoffs: &[usize]) -> Vec<CutoffMetrics> {
    let test_set: HashSet<&str> = test_items.iter().map(String::as_str).collect();
    cutoffs
        .iter()
        .map(|&k| CutoffMetrics::at(ranked, &test_set, k))
        .collect()
}

/// Running sums for one pool size
#[derive(Debug, Clone)]
pub struct MetricAccumulator {
    sums: Vec<CutoffMetrics>,
    users: usize,
}

impl MetricAccumulator {
    pub fn new(cutoff_count: usize) -> Self {
        Self {
            sums: vec![CutoffMetrics::default(); cutoff_count],
            users: 0,
        }
    }

    /// Add one user's per-cutoff metrics
    pub fn add(&mut self, user: &[CutoffMetrics]) {
        for (sum, metrics) in self.sums.iter_mut().zip(user) {
            sum.hit_rate += metrics.hit_rate;
            sum.precision += metrics.precision;
            sum.recall += metrics.recall;
            sum.f1 += metrics.f1;
        }
        self.users += 1;
    }

    pub fn users(&self) -> usize {
        self.users
    }

    /// Per-cutoff means; `None` when no user was added
    pub fn mean(&self) -> Option<Vec<CutoffMetrics>> {
        if self.users == 0 {
            return None;
        }
        let n = self.users as f64;
        Some(
            self.sums
                .iter()
                .map(|sum| CutoffMetrics {
                    hit_rate: sum.hit_rate / n,
                    precision: sum.precision / n,
                    recall: sum.recall / n,
                    f1: sum.f1 / n,
                })
                .collect(),
        )
    }
}
