//! Offline evaluation harness for hawker stall recommenders.
//!
//! This crate contains the driver that coordinates filtering, splitting,
//! candidate sampling, scoring, ranking and metric aggregation, plus the
//! store that persists the resulting tables.
//!
//! ```ignore
//! use evaluation::{EvaluationConfig, EvaluationDriver, ResultFormat, ResultStore};
//!
//! let driver = EvaluationDriver::new(EvaluationConfig::default());
//! let report = driver.run(&snapshot, &model)?;
//! ResultStore::open("results", ResultFormat::Csv)?.write_report(&report)?;
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod ranker;
pub mod store;
pub mod tables;

pub use config::{DEFAULT_CUTOFFS, EvaluationConfig};
pub use driver::{EvaluationDriver, EvaluationReport, PreparedData, RunSummary};
pub use error::{EvaluationError, Result};
pub use metrics::{CutoffMetrics, MetricAccumulator};
pub use ranker::rank;
pub use store::{ResultFormat, ResultStore, StoredTables};
pub use tables::{HitRateTable, MetricsTable, PoolResult, ResultTable};
