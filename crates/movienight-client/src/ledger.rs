//! Run ledger.
//!
//! An optional JSON file recording the outcome of every submission, so an
//! interrupted or partly failed run can be resumed without creating
//! duplicates. Entries are keyed by title and target month; the most recent
//! entry for a key wins. The file also keeps the start month of the last
//! run, so a resume in a later calendar month targets the same months.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use movienight_core::YearMonth;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Created {
        event_id: String,
        html_link: Option<String>,
    },
    Failed {
        error: String,
        /// Quota, network or server failure; a rerun may succeed.
        #[serde(default)]
        transient: bool,
    },
}

/// One recorded submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub rank: u32,
    pub title: String,
    pub month: YearMonth,
    pub date: NaiveDate,
    pub outcome: Outcome,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(rank: u32, title: &str, month: YearMonth, date: NaiveDate, outcome: Outcome) -> Self {
        Self {
            rank,
            title: title.to_string(),
            month,
            date,
            outcome,
            recorded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<YearMonth>,
    entries: Vec<LedgerEntry>,
}

/// File-backed ledger, saved after every record.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    start: Option<YearMonth>,
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Opens the ledger at `path`; a missing file is an empty ledger.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let file = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                ClientError::Ledger(format!("failed to read {}: {}", path.display(), e))
            })?;
            let file: LedgerFile = serde_json::from_str(&content).map_err(|e| {
                ClientError::Ledger(format!("failed to parse {}: {}", path.display(), e))
            })?;
            debug!("loaded {} ledger entries from {:?}", file.entries.len(), path);
            file
        } else {
            LedgerFile::default()
        };
        Ok(Self {
            path,
            start: file.start,
            entries: file.entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Start month of the run that last wrote this ledger.
    pub fn start(&self) -> Option<YearMonth> {
        self.start
    }

    /// Sets the start month saved with the next record.
    pub fn set_start(&mut self, start: YearMonth) {
        self.start = Some(start);
    }

    /// Returns the latest outcome recorded for `title` in `month`.
    pub fn outcome(&self, title: &str, month: YearMonth) -> Option<&Outcome> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.title == title && e.month == month)
            .map(|e| &e.outcome)
    }

    /// Returns true if `title` was already created for `month`.
    pub fn is_created(&self, title: &str, month: YearMonth) -> bool {
        matches!(self.outcome(title, month), Some(Outcome::Created { .. }))
    }

    /// Appends an entry and saves.
    pub fn record(&mut self, entry: LedgerEntry) -> ClientResult<()> {
        self.entries.push(entry);
        self.save()
    }

    fn save(&self) -> ClientResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = LedgerFile {
            start: self.start,
            entries: self.entries.clone(),
        };
        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| ClientError::Ledger(format!("failed to serialize: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn created(id: &str) -> Outcome {
        Outcome::Created {
            event_id: id.to_string(),
            html_link: None,
        }
    }

    fn entry(title: &str, m: YearMonth, outcome: Outcome) -> LedgerEntry {
        LedgerEntry::new(1, title, m, m.first_day().unwrap(), outcome)
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::open(dir.path().join("ledger.json")).unwrap();
        assert!(ledger.entries().is_empty());
        assert!(!ledger.is_created("Parasite", month(2024, 1)));
    }

    #[test]
    fn records_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("ledger.json");

        let mut ledger = Ledger::open(&path).unwrap();
        ledger
            .record(entry("Parasite", month(2024, 1), created("evt1")))
            .unwrap();
        ledger
            .record(entry(
                "Her",
                month(2024, 2),
                Outcome::Failed {
                    error: "quota".to_string(),
                    transient: true,
                },
            ))
            .unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = Ledger::open(&path).unwrap();
        assert_eq!(reopened.entries().len(), 2);
        assert!(reopened.is_created("Parasite", month(2024, 1)));
        assert!(!reopened.is_created("Her", month(2024, 2)));
        assert!(!reopened.is_created("Parasite", month(2024, 2)));
    }

    #[test]
    fn latest_outcome_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::open(dir.path().join("ledger.json")).unwrap();
        let m = month(2025, 6);
        ledger
            .record(entry(
                "Her",
                m,
                Outcome::Failed {
                    error: "timeout".to_string(),
                    transient: true,
                },
            ))
            .unwrap();
        assert!(!ledger.is_created("Her", m));
        ledger.record(entry("Her", m, created("evt2"))).unwrap();
        assert!(ledger.is_created("Her", m));
    }

    #[test]
    fn outcome_json_shape() {
        let json = serde_json::to_value(Outcome::Failed {
            error: "bad request".to_string(),
            transient: false,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "failed", "error": "bad request", "transient": false})
        );

        let older: Outcome =
            serde_json::from_value(serde_json::json!({"status": "failed", "error": "quota"}))
                .unwrap();
        assert!(matches!(older, Outcome::Failed { transient: false, .. }));
    }

    #[test]
    fn start_month_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let mut ledger = Ledger::open(&path).unwrap();
        assert_eq!(ledger.start(), None);
        ledger.set_start(month(2024, 1));
        ledger
            .record(entry("Parasite", month(2024, 1), created("evt1")))
            .unwrap();

        let reopened = Ledger::open(&path).unwrap();
        assert_eq!(reopened.start(), Some(month(2024, 1)));
    }

    #[test]
    fn ledger_without_start_still_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, r#"{"entries": []}"#).unwrap();
        let ledger = Ledger::open(&path).unwrap();
        assert_eq!(ledger.start(), None);
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn corrupt_ledger_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "[").unwrap();
        let err = Ledger::open(&path).unwrap_err();
        assert!(matches!(err, ClientError::Ledger(_)));
    }
}
