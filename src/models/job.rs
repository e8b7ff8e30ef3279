use serde::{Deserialize, Serialize};
use std::fmt;
use urlencoding::encode;

/// One server-side batch job, as returned by the job-creation call.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct JobHandle {
    pub endpoint_base: String,
    pub job_id: String,
}

impl JobHandle {
    pub fn new(endpoint_base: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            endpoint_base: endpoint_base.into(),
            job_id: job_id.into(),
        }
    }

    /// `{endpoint_base}/{job_id}`, where the full result lives.
    pub fn result_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint_base.trim_end_matches('/'),
            encode(&self.job_id)
        )
    }

    /// `{endpoint_base}/{job_id}/status`, polled while the job runs.
    pub fn status_url(&self) -> String {
        format!("{}/status", self.result_url())
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (job {})", self.endpoint_base, self.job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_status_and_result_urls() {
        let job = JobHandle::new(
            "https://idm.example/rest/service/id/user/batch/full",
            "1700000000000",
        );
        assert_eq!(
            job.result_url(),
            "https://idm.example/rest/service/id/user/batch/full/1700000000000"
        );
        assert_eq!(
            job.status_url(),
            "https://idm.example/rest/service/id/user/batch/full/1700000000000/status"
        );
    }

    #[test]
    fn ignores_trailing_slash_and_encodes_job_id() {
        let job = JobHandle::new("https://idm.example/rest/service/id/group/batch/", "a b/c");
        assert_eq!(
            job.status_url(),
            "https://idm.example/rest/service/id/group/batch/a%20b%2Fc/status"
        );
    }
}
