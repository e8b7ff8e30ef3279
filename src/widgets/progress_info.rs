use crate::models::progress::ProgressSnapshot;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone)]
pub struct ProgressInfo {
    pub total: u64,
    pub current: u64,
    pub percentage: f64,
    pub label: String,
    pub cancellable: bool,
}

impl ProgressInfo {
    pub fn from_snapshot(label: impl Into<String>, snapshot: &ProgressSnapshot) -> Self {
        Self {
            total: snapshot.total_entries,
            current: snapshot.done_entries,
            percentage: snapshot.percent(),
            label: label.into(),
            cancellable: !snapshot.is_complete,
        }
    }
}

/// One terminal line: `label: done / total [#####-----] 50%`.
pub fn operation_progress_line(progress: &ProgressInfo) -> String {
    let percentage = progress.percentage.clamp(0.0, 100.0);
    let filled = ((percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
    let mut line = format!(
        "{}: {} / {} [{}{}] {:>3.0}%",
        progress.label,
        progress.current,
        progress.total,
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percentage
    );
    if progress.cancellable {
        line.push_str("  (Ctrl-C to stop watching)");
    }
    line
}
