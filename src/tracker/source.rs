use crate::{
    error::SourceError,
    models::{job::JobHandle, job_result::JobResult, progress::ProgressSnapshot},
};
use futures::future::BoxFuture;

/// Where the tracker reads job status and results from.
///
/// The HTTP implementation lives in [`crate::http`]; tests use scripted fakes.
pub trait JobSource: Send + Sync + 'static {
    /// `GET {endpoint_base}/{job_id}/status`
    fn fetch_status<'a>(
        &'a self,
        job: &'a JobHandle,
    ) -> BoxFuture<'a, Result<ProgressSnapshot, SourceError>>;

    /// `GET {endpoint_base}/{job_id}`
    fn fetch_result<'a>(
        &'a self,
        job: &'a JobHandle,
    ) -> BoxFuture<'a, Result<JobResult, SourceError>>;
}
