//! Parsers for snapshot files.
//!
//! A snapshot directory holds two collections exported from the document
//! store, each either as CSV (header row, one record per line) or as JSON
//! (one array of records):
//! - stalls.csv / stalls.json: stall_id (or place_id), name, address,
//!   centre_id (or hawker_centre_id), rating, business_status
//! - reviews.csv / reviews.json: author, stall_id (or place_id), rating,
//!   relative_time, timestamp, review_text
//!
//! Only the identifier columns are required. Extra columns are ignored.

use crate::error::{DataLoadError, Result};
use crate::types::{Review, Stall};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Find `<stem>.csv` or `<stem>.json` in `dir`, preferring CSV
pub fn locate(dir: &Path, stem: &str) -> Result<PathBuf> {
    ["csv", "json"]
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|path| path.exists())
        .ok_or_else(|| DataLoadError::FileNotFound {
            path: dir.join(format!("{stem}.{{csv,json}}")).display().to_string(),
        })
}

/// Parse the stall catalog
pub fn parse_stalls(path: &Path) -> Result<Vec<Stall>> {
    parse_records(path)
}

/// Parse the review log
pub fn parse_reviews(path: &Path) -> Result<Vec<Review>> {
    parse_records(path)
}

fn parse_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        parse_json(path)
    } else {
        parse_csv(path)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn parse_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let record: T = result.map_err(|e| match e.position() {
            Some(position) => DataLoadError::ParseError {
                file: file_label(path),
                line: position.line() as usize,
                reason: e.to_string(),
            },
            // header is line 1, so record idx sits on line idx + 2
            None => DataLoadError::ParseError {
                file: file_label(path),
                line: idx + 2,
                reason: e.to_string(),
            },
        })?;
        records.push(record);
    }
    Ok(records)
}

fn csv_error(path: &Path, error: csv::Error) -> DataLoadError {
    let reason = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            DataLoadError::FileNotFound {
                path: path.display().to_string(),
            }
        }
        csv::ErrorKind::Io(io) => DataLoadError::IoError(io),
        _ => DataLoadError::ParseError {
            file: file_label(path),
            line: 0,
            reason,
        },
    }
}

fn parse_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    // Decode element by element so a bad record reports its index
    let values: Vec<serde_json::Value> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| DataLoadError::ParseError {
            file: file_label(path),
            line: e.line(),
            reason: e.to_string(),
        })?;

    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            serde_json::from_value(value).map_err(|e| DataLoadError::ParseError {
                file: file_label(path),
                line: idx,
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_stalls_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "stalls.csv",
            "stall_id,name,address,rating,business_status\n\
             s1,Chicken Rice,1 Maxwell Rd,4.5,OPERATIONAL\n\
             s2,DBS ATM,1 Maxwell Rd,,\n",
        );

        let stalls = parse_stalls(&path).unwrap();
        assert_eq!(stalls.len(), 2);
        assert_eq!(stalls[0].stall_id, "s1");
        assert_eq!(stalls[0].rating, Some(4.5));
        assert_eq!(stalls[0].business_status.as_deref(), Some("OPERATIONAL"));
        assert_eq!(stalls[1].rating, None);
    }

    #[test]
    fn test_parse_reviews_csv_with_missing_rating() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "reviews.csv",
            "author,place_id,rating,relative_time\n\
             alice,s1,5,2 months ago\n\
             bob,s1,,a year ago\n",
        );

        let reviews = parse_reviews(&path).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].stall_id, "s1");
        assert_eq!(reviews[0].rating, Some(5.0));
        assert_eq!(reviews[1].rating, None);
        assert_eq!(reviews[1].relative_time.as_deref(), Some("a year ago"));
    }

    #[test]
    fn test_parse_reviews_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "reviews.json",
            r#"[{"author":"alice","stall_id":"s1","rating":"4","timestamp":1700000000},
                {"author":"bob","stall_id":"s2","rating":null,"relative_time":null}]"#,
        );

        let reviews = parse_reviews(&path).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].timestamp, Some(1_700_000_000));
        assert_eq!(reviews[1].rating, None);
    }

    #[test]
    fn test_parse_error_reports_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "reviews.json", r#"[{"author":"alice"}]"#);

        let err = parse_reviews(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 0, .. }));
    }

    #[test]
    fn test_locate_prefers_csv() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "stalls.json", "[]");
        assert!(locate(dir.path(), "stalls").unwrap().ends_with("stalls.json"));

        write_file(dir.path(), "stalls.csv", "stall_id\n");
        assert!(locate(dir.path(), "stalls").unwrap().ends_with("stalls.csv"));

        assert!(matches!(
            locate(dir.path(), "reviews"),
            Err(DataLoadError::FileNotFound { .. })
        ));
    }
}
