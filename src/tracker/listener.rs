use crate::{
    error::TrackerError,
    models::{job_result::JobResult, progress::ProgressSnapshot},
};
use tokio::sync::mpsc;

/// Receives the notifications of one tracked job.
///
/// Callbacks run on the polling task, in response order. After `on_complete` or
/// `on_error` nothing else is delivered.
pub trait JobListener: Send + 'static {
    fn on_progress(&mut self, snapshot: &ProgressSnapshot);

    fn on_complete(&mut self, result: JobResult);

    fn on_error(&mut self, error: TrackerError) {
        log::error!("Import tracking stopped: {error}");
    }
}

#[derive(Debug)]
pub enum TrackerEvent {
    Progress(ProgressSnapshot),
    Complete(JobResult),
    Failed(TrackerError),
}

/// Forwards every notification as a [`TrackerEvent`] on an unbounded channel.
///
/// The receiver yields `None` once the run is over or was cancelled.
pub struct ChannelListener {
    sender: mpsc::UnboundedSender<TrackerEvent>,
}

impl ChannelListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TrackerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn forward(&self, event: TrackerEvent) {
        if self.sender.send(event).is_err() {
            log::debug!("Tracker event dropped, receiver is gone");
        }
    }
}

impl JobListener for ChannelListener {
    fn on_progress(&mut self, snapshot: &ProgressSnapshot) {
        self.forward(TrackerEvent::Progress(snapshot.clone()));
    }

    fn on_complete(&mut self, result: JobResult) {
        self.forward(TrackerEvent::Complete(result));
    }

    fn on_error(&mut self, error: TrackerError) {
        self.forward(TrackerEvent::Failed(error));
    }
}
