use crate::utils::json::deserialize_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time read of a batch job's progress.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(from = "RawProgressSnapshot", rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub total_entries: u64,
    pub done_entries: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub is_complete: bool,
    pub status_text: Option<String>,
}

impl ProgressSnapshot {
    /// Builds a snapshot, clamping `done_entries` to `total_entries`.
    pub fn new(total_entries: u64, done_entries: u64, is_complete: bool) -> Self {
        let mut snapshot = Self {
            total_entries,
            done_entries,
            is_complete,
            ..Self::default()
        };
        snapshot.clamp_done();
        snapshot
    }

    pub fn percent(&self) -> f64 {
        if self.total_entries == 0 {
            return if self.is_complete { 100.0 } else { 0.0 };
        }
        self.done_entries.min(self.total_entries) as f64 * 100.0 / self.total_entries as f64
    }

    fn clamp_done(&mut self) {
        if self.done_entries > self.total_entries {
            log::warn!(
                "Server reported {} done entries out of {}, clamping",
                self.done_entries,
                self.total_entries
            );
            self.done_entries = self.total_entries;
        }
    }
}

// NOTE: the batch endpoints answer with short names (`entries`, `done`, `start`, `end`,
//       `status`); the descriptive names are accepted too, and are what we serialize.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProgressSnapshot {
    #[serde(default, alias = "entries")]
    total_entries: u64,
    #[serde(default, alias = "done")]
    done_entries: u64,
    #[serde(default, alias = "start", deserialize_with = "deserialize_timestamp")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "end", deserialize_with = "deserialize_timestamp")]
    finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    is_complete: Option<bool>,
    #[serde(default)]
    status: Option<bool>,
    #[serde(default)]
    status_text: Option<String>,
}

impl From<RawProgressSnapshot> for ProgressSnapshot {
    fn from(raw: RawProgressSnapshot) -> Self {
        // The server stamps `end` and flips `status` together once the last entry is processed.
        let is_complete = raw.is_complete.unwrap_or(false)
            || raw.status.unwrap_or(false)
            || raw.finished_at.is_some();
        let mut snapshot = Self {
            total_entries: raw.total_entries,
            done_entries: raw.done_entries,
            started_at: raw.started_at,
            finished_at: raw.finished_at,
            is_complete,
            status_text: raw.status_text.filter(|text| !text.trim().is_empty()),
        };
        snapshot.clamp_done();
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_server_short_names() {
        let snapshot: ProgressSnapshot = serde_json::from_value(json!({
            "entries": 10,
            "done": 3,
            "start": 1_700_000_000_000_i64,
            "end": null,
            "status": null,
            "statusText": null
        }))
        .unwrap();
        assert_eq!(snapshot.total_entries, 10);
        assert_eq!(snapshot.done_entries, 3);
        assert_eq!(snapshot.started_at.unwrap().timestamp(), 1_700_000_000);
        assert!(snapshot.finished_at.is_none());
        assert!(!snapshot.is_complete);
        assert!(snapshot.status_text.is_none());
    }

    #[test]
    fn end_timestamp_marks_completion() {
        let snapshot: ProgressSnapshot = serde_json::from_value(json!({
            "entries": 2,
            "done": 2,
            "start": 1_700_000_000_000_i64,
            "end": 1_700_000_004_000_i64
        }))
        .unwrap();
        assert!(snapshot.is_complete);
        assert_eq!(snapshot.finished_at.unwrap().timestamp(), 1_700_000_004);
    }

    #[test]
    fn parses_descriptive_names() {
        let snapshot: ProgressSnapshot = serde_json::from_value(json!({
            "totalEntries": 4,
            "doneEntries": 4,
            "startedAt": "2024-03-01T10:00:00Z",
            "finishedAt": "2024-03-01T10:00:05Z",
            "isComplete": true,
            "statusText": "done"
        }))
        .unwrap();
        assert!(snapshot.is_complete);
        assert_eq!(snapshot.status_text.as_deref(), Some("done"));
    }

    #[test]
    fn serialized_form_reads_back() {
        let snapshot = ProgressSnapshot::new(8, 5, false);
        let text = serde_json::to_string(&snapshot).unwrap();
        assert!(text.contains("\"doneEntries\":5"));
        let back: ProgressSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn done_is_clamped_to_total() {
        let snapshot: ProgressSnapshot =
            serde_json::from_value(json!({ "entries": 3, "done": 5 })).unwrap();
        assert_eq!(snapshot.done_entries, 3);
        assert_eq!(ProgressSnapshot::new(1, 9, false).done_entries, 1);
    }

    #[test]
    fn percent_handles_empty_jobs() {
        assert_eq!(ProgressSnapshot::new(0, 0, false).percent(), 0.0);
        assert_eq!(ProgressSnapshot::new(0, 0, true).percent(), 100.0);
        assert_eq!(ProgressSnapshot::new(10, 3, false).percent(), 30.0);
    }
}
