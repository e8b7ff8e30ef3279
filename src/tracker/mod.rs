//! Tracks one asynchronous batch job until the server reports it complete.
//!
//! A [`Tracker`] owns at most one polling task. The task waits one period, asks for
//! the job status, hands the snapshot to the listener and only then schedules the
//! next period, so there is never more than one request outstanding. Once a
//! snapshot is complete the full result is fetched once and the task ends.

mod listener;
mod source;

pub use listener::{ChannelListener, JobListener, TrackerEvent};
pub use source::JobSource;

use crate::{
    error::{PollRequest, SourceError, TrackerError},
    models::{job::JobHandle, tracker_state::TrackerState},
};
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

type SharedState = Arc<Mutex<TrackerState>>;

fn read_state(state: &SharedState) -> TrackerState {
    *state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn write_state(state: &SharedState, value: TrackerState) {
    *state.lock().unwrap_or_else(PoisonError::into_inner) = value;
}

/// The polling task of one job.
struct Run {
    job: JobHandle,
    state: SharedState,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Run {
    fn state(&self) -> TrackerState {
        read_state(&self.state)
    }

    // Cancelling first guarantees no callback fires even if the abort lands late.
    fn stop(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

pub struct Tracker<S: JobSource> {
    source: Arc<S>,
    interval: Duration,
    run: Option<Run>,
}

impl<S: JobSource> Tracker<S> {
    pub fn new(source: S) -> Self {
        Self::with_interval(source, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(source: S, interval: Duration) -> Self {
        Self {
            source: Arc::new(source),
            interval,
            run: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> TrackerState {
        self.run.as_ref().map_or(TrackerState::Idle, Run::state)
    }

    /// The job of the current or last finished run, `None` once cancelled.
    pub fn job(&self) -> Option<&JobHandle> {
        self.run.as_ref().map(|run| &run.job)
    }

    /// Starts tracking `job`. Whatever this tracker was polling before is stopped
    /// first; the first status request goes out one interval from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<L: JobListener>(&mut self, job: JobHandle, listener: L) {
        if let Some(previous) = self.run.take() {
            if previous.state() == TrackerState::Polling {
                log::info!("Stopped tracking {} in favor of {}", previous.job, job);
            }
            previous.stop();
        }

        log::info!(
            "Tracking {} every {}ms",
            job,
            self.interval.as_millis()
        );
        let state: SharedState = Arc::new(Mutex::new(TrackerState::Polling));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_job(
            Arc::clone(&self.source),
            job.clone(),
            self.interval,
            Arc::clone(&state),
            cancel.clone(),
            listener,
        ));
        self.run = Some(Run {
            job,
            state,
            cancel,
            task,
        });
    }

    /// Stops polling. The server-side job is not told and keeps running.
    ///
    /// No-op when nothing is being polled.
    pub fn cancel(&mut self) {
        if self.state() != TrackerState::Polling {
            return;
        }
        if let Some(run) = self.run.take() {
            log::info!("Stopped tracking {}, the server keeps running it", run.job);
            run.stop();
        }
    }
}

impl<S: JobSource> Drop for Tracker<S> {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            run.stop();
        }
    }
}

async fn poll_job<S: JobSource, L: JobListener>(
    source: Arc<S>,
    job: JobHandle,
    interval: Duration,
    state: SharedState,
    cancel: CancellationToken,
    mut listener: L,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }

        log::debug!("GET {}", job.status_url());
        let polled = source.fetch_status(&job).await;
        if cancel.is_cancelled() {
            log::debug!("Discarding status of {job}, tracking was cancelled");
            return;
        }
        match polled {
            Ok(snapshot) => {
                log::debug!(
                    "{}: {}/{} done, complete: {}",
                    job,
                    snapshot.done_entries,
                    snapshot.total_entries,
                    snapshot.is_complete
                );
                listener.on_progress(&snapshot);
                if snapshot.is_complete {
                    break;
                }
            }
            Err(error) => {
                fail(&state, &mut listener, job, PollRequest::Status, error);
                return;
            }
        }
    }

    log::debug!("GET {}", job.result_url());
    let fetched = source.fetch_result(&job).await;
    if cancel.is_cancelled() {
        log::debug!("Discarding result of {job}, tracking was cancelled");
        return;
    }
    match fetched {
        Ok(result) => {
            log::info!(
                "{} completed: {} entries, {} failed",
                job,
                result.entries.len(),
                result.error_count()
            );
            write_state(&state, TrackerState::Completed);
            listener.on_complete(result);
        }
        Err(error) => fail(&state, &mut listener, job, PollRequest::Result, error),
    }
}

fn fail<L: JobListener>(
    state: &SharedState,
    listener: &mut L,
    job: JobHandle,
    request: PollRequest,
    source: SourceError,
) {
    log::error!("Polling {job} failed, not retrying: {source}");
    write_state(state, TrackerState::Failed);
    listener.on_error(TrackerError::PollFailed {
        job,
        request,
        source,
    });
}
