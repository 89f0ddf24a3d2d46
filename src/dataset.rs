use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{DashboardError, DashboardResult};

pub const REQUIRED_COLUMNS: [&str; 19] = [
    "team1",
    "team2",
    "possession team1",
    "possession team2",
    "possession in contest",
    "number of goals team1",
    "number of goals team2",
    "total attempts team1",
    "total attempts team2",
    "passes team1",
    "passes team2",
    "passes completed team1",
    "passes completed team2",
    "fouls against team1",
    "fouls against team2",
    "free kicks team1",
    "free kicks team2",
    "goal preventions team1",
    "goal preventions team2",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchRecord {
    pub team1: String,
    pub team2: String,
    #[serde(rename = "number of goals team1")]
    pub goals1: u32,
    #[serde(rename = "number of goals team2")]
    pub goals2: u32,
    #[serde(rename = "total attempts team1")]
    pub attempts1: u32,
    #[serde(rename = "total attempts team2")]
    pub attempts2: u32,
    #[serde(rename = "passes team1")]
    pub passes1: u32,
    #[serde(rename = "passes completed team1")]
    pub passes_completed1: u32,
    #[serde(rename = "passes team2")]
    pub passes2: u32,
    #[serde(rename = "passes completed team2")]
    pub passes_completed2: u32,
    // Kept raw ("42%"); parsing happens in the possession deriver.
    #[serde(rename = "possession team1")]
    pub possession1: String,
    #[serde(rename = "possession team2")]
    pub possession2: String,
    #[serde(rename = "possession in contest")]
    pub possession_contested: String,
    #[serde(rename = "fouls against team1")]
    pub fouls_against1: u32,
    #[serde(rename = "fouls against team2")]
    pub fouls_against2: u32,
    #[serde(rename = "free kicks team1")]
    pub free_kicks1: u32,
    #[serde(rename = "free kicks team2")]
    pub free_kicks2: u32,
    #[serde(rename = "goal preventions team1")]
    pub goal_preventions1: u32,
    #[serde(rename = "goal preventions team2")]
    pub goal_preventions2: u32,
}

impl MatchRecord {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.team1, self.team2)
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<MatchRecord>,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Builds a dataset from already-parsed records. Empty input is rejected
    /// the same way an empty file is.
    pub fn from_records(records: Vec<MatchRecord>) -> DashboardResult<Self> {
        if records.is_empty() {
            return Err(DashboardError::DataLoad("dataset has no rows".to_string()));
        }
        Ok(Self {
            records,
            source: None,
            loaded_at: Utc::now(),
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> DashboardResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| DashboardError::DataLoad(format!("unreadable header row: {err}")))?
            .clone();
        let missing = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == **col))
            .copied()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(DashboardError::DataLoad(format!(
                "missing columns: {}",
                missing.join(", ")
            )));
        }

        let mut records = Vec::new();
        for (row, result) in csv_reader.deserialize::<MatchRecord>().enumerate() {
            // +2: one for the header, one for 1-based line numbers.
            let record = result
                .map_err(|err| DashboardError::DataLoad(format!("line {}: {err}", row + 2)))?;
            records.push(record);
        }

        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn check_index(&self, index: i64) -> DashboardResult<usize> {
        usize::try_from(index)
            .ok()
            .filter(|idx| *idx < self.records.len())
            .ok_or(DashboardError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
    }

    pub fn get(&self, index: i64) -> DashboardResult<&MatchRecord> {
        let idx = self.check_index(index)?;
        Ok(&self.records[idx])
    }
}

pub fn load_dataset(path: &Path) -> DashboardResult<Dataset> {
    let file = File::open(path)
        .map_err(|err| DashboardError::DataLoad(format!("{}: {err}", path.display())))?;
    let mut dataset = Dataset::from_reader(file).map_err(|err| match err {
        DashboardError::DataLoad(msg) => {
            DashboardError::DataLoad(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;
    dataset.source = Some(path.to_path_buf());
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_index_rejects_negative_and_past_end() {
        let header = REQUIRED_COLUMNS.join(",");
        let row = "A,B,50%,40%,10%,1,0,3,4,10,12,8,9,1,2,3,4,5,6";
        let raw = format!("{header}\n{row}\n");
        let data = Dataset::from_reader(raw.as_bytes()).unwrap();
        assert_eq!(data.check_index(0).unwrap(), 0);
        assert!(data.check_index(-1).is_err());
        assert!(data.check_index(1).is_err());
    }
}
