//! Writing a split to disk.
//!
//! Models are fitted outside this workspace. Exporting the exact train
//! half lets a trainer fit on the same interactions the harness will later
//! hold out against.

use crate::split::InteractionSplit;
use anyhow::{Context, Result};
use data_loader::Interaction;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Paths written by [`write_split`]
#[derive(Debug, Clone)]
pub struct SplitFiles {
    pub train: PathBuf,
    pub test: PathBuf,
}

/// Write `train.csv` and `test.csv` into `out_dir`, creating it if needed
pub fn write_split(split: &InteractionSplit, out_dir: &Path) -> Result<SplitFiles> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let files = SplitFiles {
        train: out_dir.join("train.csv"),
        test: out_dir.join("test.csv"),
    };

    let train = write_interactions(&files.train, split.train_interactions())?;
    let test = write_interactions(&files.test, split.test_interactions())?;

    info!(
        "Wrote {} train and {} test interactions to {}",
        train,
        test,
        out_dir.display()
    );
    Ok(files)
}

fn write_interactions<'a>(
    path: &Path,
    interactions: impl Iterator<Item = &'a Interaction>,
) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut count = 0;
    for interaction in interactions {
        writer
            .serialize(interaction)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        count += 1;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(count)
}
