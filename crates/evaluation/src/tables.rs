//! Result tables.
//!
//! Two tables per model run, one row per pool size:
//! - hit rate: `pool_size`, `users`, `HitRate@k`...
//! - metrics: `pool_size`, `users`, `Precision@k`..., `Recall@k`..., `F1@k`...
//!
//! A pool that no user contributed to has empty metric cells (`null` in
//! JSON) rather than zeros or NaN.

use crate::metrics::CutoffMetrics;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

/// Aggregated metrics of one pool size
#[derive(Debug, Clone, PartialEq)]
pub struct PoolResult {
    pub pool_size: usize,
    pub users: usize,
    /// One entry per cutoff; `None` when `users` is 0
    pub metrics: Option<Vec<CutoffMetrics>>,
}

impl PoolResult {
    fn cell(&self, index: usize, field: impl Fn(&CutoffMetrics) -> f64) -> Value {
        self.metrics
            .as_ref()
            .and_then(|metrics| metrics.get(index))
            .map(|m| Value::from(field(m)))
            .unwrap_or(Value::Null)
    }

    fn leading_cells(&self) -> Vec<Value> {
        vec![Value::from(self.pool_size), Value::from(self.users)]
    }
}

/// A table with named columns and JSON-valued cells
pub trait ResultTable {
    /// File name stem suffix, e.g. `hitrate` for `<model>_hitrate.csv`
    fn kind(&self) -> &'static str;

    fn columns(&self) -> Vec<String>;

    fn rows(&self) -> Vec<Vec<Value>>;
}

fn serialize_table<T: ResultTable, S: Serializer>(table: &T, serializer: S) -> Result<S::Ok, S::Error> {
    let columns = table.columns();
    let rows = table.rows();

    let mut seq = serializer.serialize_seq(Some(rows.len()))?;
    for row in &rows {
        seq.serialize_element(&Record {
            columns: &columns,
            cells: row,
        })?;
    }
    seq.end()
}

struct Record<'a> {
    columns: &'a [String],
    cells: &'a [Value],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

// =============================================================================
// Hit rate
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HitRateTable {
    pub cutoffs: Vec<usize>,
    pub pools: Vec<PoolResult>,
}

impl ResultTable for HitRateTable {
    fn kind(&self) -> &'static str {
        "hitrate"
    }

    fn columns(&self) -> Vec<String> {
        let mut columns = vec!["pool_size".to_string(), "users".to_string()];
        columns.extend(self.cutoffs.iter().map(|k| format!("HitRate@{}", k)));
        columns
    }

    fn rows(&self) -> Vec<Vec<Value>> {
        self.pools
            .iter()
            .map(|pool| {
                let mut row = pool.leading_cells();
                row.extend((0..self.cutoffs.len()).map(|i| pool.cell(i, |m| m.hit_rate)));
                row
            })
            .collect()
    }
}

impl Serialize for HitRateTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_table(self, serializer)
    }
}

// =============================================================================
// Precision / Recall / F1
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsTable {
    pub cutoffs: Vec<usize>,
    pub pools: Vec<PoolResult>,
}

impl ResultTable for MetricsTable {
    fn kind(&self) -> &'static str {
        "metrics"
    }

    fn columns(&self) -> Vec<String> {
        let mut columns = vec!["pool_size".to_string(), "users".to_string()];
        for name in ["Precision", "Recall", "F1"] {
            columns.extend(self.cutoffs.iter().map(|k| format!("{}@{}", name, k)));
        }
        columns
    }

    fn rows(&self) -> Vec<Vec<Value>> {
        let n = self.cutoffs.len();
        self.pools
            .iter()
            .map(|pool| {
                let mut row = pool.leading_cells();
                row.extend((0..n).map(|i| pool.cell(i, |m| m.precision)));
                row.extend((0..n).map(|i| pool.cell(i, |m| m.recall)));
                row.extend((0..n).map(|i| pool.cell(i, |m| m.f1)));
                row
            })
            .collect()
    }
}

impl Serialize for MetricsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_table(self, serializer)
    }
}

/// Both tables from the same per-pool results
pub fn build_tables(cutoffs: &[usize], pools: Vec<PoolResult>) -> (HitRateTable, MetricsTable) {
    let hit_rate = HitRateTable {
        cutoffs: cutoffs.to_vec(),
        pools: pools.clone(),
    };
    let metrics = MetricsTable {
        cutoffs: cutoffs.to_vec(),
        pools,
    };
    (hit_rate, metrics)
}

/// Render a cell as text; null becomes empty, floats get `precision`
/// decimals when given and full precision otherwise
pub fn format_cell(value: &Value, precision: Option<usize>) -> String {
    match (value, precision) {
        (Value::Null, _) => String::new(),
        (Value::Number(n), Some(precision)) if n.is_f64() => {
            format!("{:.*}", precision, n.as_f64().unwrap_or_default())
        }
        (other, _) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_pools() -> Vec<PoolResult> {
        vec![
            PoolResult {
                pool_size: 50,
                users: 2,
                metrics: Some(vec![
                    CutoffMetrics { hit_rate: 0.5, precision: 0.5, recall: 0.25, f1: 0.25 },
                    CutoffMetrics { hit_rate: 1.0, precision: 0.5, recall: 0.5, f1: 0.5 },
                ]),
            },
            PoolResult {
                pool_size: 100,
                users: 0,
                metrics: None,
            },
        ]
    }

    #[test]
    fn test_column_names() {
        let (hit_rate, metrics) = build_tables(&[1, 2], create_test_pools());
        assert_eq!(hit_rate.columns(), vec!["pool_size", "users", "HitRate@1", "HitRate@2"]);
        assert_eq!(
            metrics.columns(),
            vec![
                "pool_size", "users", "Precision@1", "Precision@2", "Recall@1", "Recall@2",
                "F1@1", "F1@2"
            ]
        );
    }

    #[test]
    fn test_json_records() {
        let (hit_rate, metrics) = build_tables(&[1, 2], create_test_pools());

        let json = serde_json::to_value(&hit_rate).unwrap();
        assert_eq!(json[0]["pool_size"], 50);
        assert_eq!(json[0]["HitRate@2"], 1.0);
        assert!(json[1]["HitRate@1"].is_null(), "Empty pool should have null metrics");
        assert_eq!(json[1]["users"], 0);

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json[0]["Recall@1"], 0.25);
        assert_eq!(json[0]["F1@2"], 0.5);
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&Value::Null, None), "");
        assert_eq!(format_cell(&Value::from(50usize), Some(4)), "50");
        assert_eq!(format_cell(&Value::from(0.5), None), "0.5");
        assert_eq!(format_cell(&Value::from(0.5), Some(4)), "0.5000");
    }
}
