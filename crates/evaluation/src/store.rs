//! Result store.
//!
//! Each model run persists two tables, `<model>_hitrate.<ext>` and
//! `<model>_metrics.<ext>`, overwriting the previous run's files. Tables
//! are written to a temporary file in the same directory and renamed into
//! place, so a crashed run never leaves a half-written table behind.

use crate::driver::EvaluationReport;
use crate::error::{EvaluationError, Result};
use crate::tables::{ResultTable, format_cell};
use serde::Serialize;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// On-disk table format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultFormat {
    #[default]
    Csv,
    /// Array of records keyed by column name
    Json,
}

impl ResultFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ResultFormat::Csv => "csv",
            ResultFormat::Json => "json",
        }
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ResultFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ResultFormat::Csv),
            "json" => Ok(ResultFormat::Json),
            other => Err(format!("unknown result format '{}', expected csv or json", other)),
        }
    }
}

/// Files written for one report
#[derive(Debug, Clone)]
pub struct StoredTables {
    pub hit_rate: PathBuf,
    pub metrics: PathBuf,
}

/// Directory that result tables are written to
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
    format: ResultFormat,
}

impl ResultStore {
    /// Use `dir` as the result directory, creating it if needed
    pub fn open(dir: impl Into<PathBuf>, format: ResultFormat) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| EvaluationError::io(&dir, e))?;
        Ok(Self { dir, format })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a table for `model`
    pub fn table_path(&self, model: &str, kind: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}.{}", model, kind, self.format.extension()))
    }

    /// Write both tables of a report under the report's model name
    pub fn write_report(&self, report: &EvaluationReport) -> Result<StoredTables> {
        let model = &report.summary.model;
        let stored = StoredTables {
            hit_rate: self.write_table(model, &report.hit_rate)?,
            metrics: self.write_table(model, &report.metrics)?,
        };
        info!(
            "Stored results for {} in {}",
            model,
            self.dir.display()
        );
        Ok(stored)
    }

    /// Write one table, replacing any previous version
    pub fn write_table<T: ResultTable + Serialize>(&self, model: &str, table: &T) -> Result<PathBuf> {
        let path = self.table_path(model, table.kind());
        let tmp_path = path.with_extension(format!("{}.tmp", self.format.extension()));

        let file = File::create(&tmp_path).map_err(|e| EvaluationError::io(&tmp_path, e))?;
        match self.format {
            ResultFormat::Csv => write_csv(file, table)?,
            ResultFormat::Json => write_json(file, table, &tmp_path)?,
        }

        fs::rename(&tmp_path, &path).map_err(|e| EvaluationError::io(&path, e))?;
        Ok(path)
    }
}

fn write_csv<T: ResultTable>(file: File, table: &T) -> Result<()> {
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| format_cell(cell, None)))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn write_json<T: Serialize>(file: File, table: &T, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, table)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| EvaluationError::io(path, e))
}
