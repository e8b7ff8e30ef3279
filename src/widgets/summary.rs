use crate::models::{
    job_result::JobResult, progress::ProgressSnapshot, summary_status::SummaryStatus,
};
use chrono::{DateTime, Local, Utc};

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|time| time.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn status_block(snapshot: &ProgressSnapshot, status: SummaryStatus) -> String {
    [
        format!("Started  : {}", format_time(snapshot.started_at)),
        format!("Finished : {}", format_time(snapshot.finished_at)),
        format!("Entries  : {}", snapshot.total_entries),
        format!("Done     : {}", snapshot.done_entries),
        format!("Status   : {}", status.label()),
        format!(
            "Details  : {}",
            snapshot.status_text.as_deref().unwrap_or("-")
        ),
    ]
    .join("\n")
}

/// Status block shown while a job runs.
pub fn snapshot_summary(snapshot: &ProgressSnapshot) -> String {
    let status = if snapshot.is_complete {
        SummaryStatus::Successful
    } else {
        SummaryStatus::InProgress
    };
    status_block(snapshot, status)
}

/// Final panel: the status block, the overall verdict and one line per rejected record.
pub fn result_summary(result: &JobResult) -> String {
    let mut panel = status_block(&result.status, result.summary_status());
    let errors: Vec<String> = result
        .errors()
        .map(|entry| {
            format!(
                "  {} : {}",
                entry.label(),
                entry.error.as_deref().unwrap_or_default()
            )
        })
        .collect();
    if !errors.is_empty() {
        panel.push_str(&format!("\nErrors ({}):\n{}", errors.len(), errors.join("\n")));
    }
    panel
}
