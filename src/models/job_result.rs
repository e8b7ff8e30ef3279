use super::{progress::ProgressSnapshot, summary_status::SummaryStatus};
use crate::utils::json::optional_raw_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one imported record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "RawEntryOutcome")]
pub struct EntryOutcome {
    pub id: Option<String>,
    pub succeeded: Option<bool>,
    pub error: Option<String>,
}

impl EntryOutcome {
    pub fn succeeded(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            succeeded: Some(true),
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            succeeded: Some(false),
            error: Some(error.into()),
        }
    }

    /// A record failed when it carries error text, whatever its status flag says.
    pub fn is_failure(&self) -> bool {
        self.error.as_deref().is_some_and(|text| !text.trim().is_empty())
    }

    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("?")
    }
}

// NOTE: user imports identify entries by `id`, user updates by `user` and group
//       imports by `name`. The whole entry is kept as a map so none of them clash.
#[derive(Deserialize)]
struct RawEntryOutcome {
    #[serde(flatten)]
    fields: serde_json::Map<String, Value>,
}

impl From<RawEntryOutcome> for EntryOutcome {
    fn from(raw: RawEntryOutcome) -> Self {
        let id = ["id", "user", "name"]
            .iter()
            .find_map(|key| optional_raw_string(raw.fields.get(*key)));
        let succeeded = raw
            .fields
            .get("succeeded")
            .or_else(|| raw.fields.get("status"))
            .and_then(Value::as_bool);
        let error = ["error", "statusText"]
            .iter()
            .find_map(|key| optional_raw_string(raw.fields.get(*key)));
        Self {
            id,
            succeeded,
            error,
        }
    }
}

/// Final outcome of a batch job, fetched once the status reports completion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub status: ProgressSnapshot,
    #[serde(default)]
    pub entries: Vec<EntryOutcome>,
}

impl JobResult {
    pub fn errors(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries.iter().filter(|entry| entry.is_failure())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// The job completed but some records were rejected.
    pub fn is_partial_failure(&self) -> bool {
        self.error_count() > 0
    }

    pub fn summary_status(&self) -> SummaryStatus {
        match self.error_count() {
            0 => SummaryStatus::Successful,
            errors if errors == self.entries.len() => SummaryStatus::Failed,
            _ => SummaryStatus::PartiallyFailed,
        }
    }
}
