use crate::{
    config::Config,
    error::{SourceError, TrackerError},
    models::{job::JobHandle, job_result::JobResult, progress::ProgressSnapshot},
    tracker::JobSource,
    utils::json::parse_serde_json_value_to_raw_string,
};
use anyhow::Result;
use futures::future::BoxFuture;
use reqwest::{
    header::{HeaderValue, ACCEPT},
    multipart::{Form, Part},
    Client, ClientBuilder,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// A CSV file to hand over to a batch endpoint.
#[derive(Debug, Clone)]
pub struct BatchUpload {
    pub file_name: String,
    pub content: Vec<u8>,
    /// Ordered CSV columns; the server falls back to its defaults when empty.
    pub columns: Vec<String>,
    pub encoding: Option<String>,
    /// Turns off server-side notifications such as mails.
    pub quiet: bool,
}

impl BatchUpload {
    fn into_form(self) -> Result<Form, reqwest::Error> {
        let csv = Part::bytes(self.content)
            .file_name(self.file_name)
            .mime_str("text/csv")?;
        let mut form = Form::new().part("csv-file", csv);
        for column in self.columns {
            form = form.text("columns", column);
        }
        if let Some(encoding) = self.encoding {
            form = form.text("encoding", encoding);
        }
        if self.quiet {
            form = form.text("quiet", "true");
        }
        Ok(form)
    }
}

/// Talks to the batch endpoints over HTTP.
#[derive(Debug, Clone)]
pub struct HttpJobSource {
    http_client: Client,
}

impl HttpJobSource {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = ClientBuilder::new()
            .danger_accept_invalid_certs(config.trust_invalid_certs)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { http_client })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let response: reqwest::Response = self
            .http_client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Status {
                code: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// `POST {endpoint_base}` with the CSV, returning the handle of the created job.
    pub async fn submit_batch(
        &self,
        endpoint_base: &str,
        upload: BatchUpload,
    ) -> Result<JobHandle, TrackerError> {
        let submission_failed = |source: SourceError| TrackerError::SubmissionFailed {
            endpoint: endpoint_base.to_string(),
            source,
        };
        log::info!(
            "Uploading {} ({} bytes) to {}",
            upload.file_name,
            upload.content.len(),
            endpoint_base
        );
        let form = upload
            .into_form()
            .map_err(|e| submission_failed(e.into()))?;
        let response: reqwest::Response = self
            .http_client
            .post(endpoint_base)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| submission_failed(e.into()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| submission_failed(e.into()))?;
        if !status.is_success() {
            return Err(submission_failed(SourceError::Status {
                code: status.as_u16(),
                body,
            }));
        }
        let job_id = parse_job_id(&body).map_err(submission_failed)?;
        log::info!("Batch job {job_id} created at {endpoint_base}");
        Ok(JobHandle::new(endpoint_base, job_id))
    }
}

/// The creation call answers with the bare identifier, as a JSON number or string.
fn parse_job_id(body: &str) -> Result<String, SourceError> {
    let value: Value = serde_json::from_str(body.trim())?;
    match value {
        Value::Number(_) | Value::String(_) => {
            let job_id = parse_serde_json_value_to_raw_string(&value);
            if job_id.is_empty() {
                return Err(SourceError::Unexpected("empty job identifier".to_string()));
            }
            Ok(job_id)
        }
        other => Err(SourceError::Unexpected(format!(
            "expected a job identifier, got {other}"
        ))),
    }
}

impl JobSource for HttpJobSource {
    fn fetch_status<'a>(
        &'a self,
        job: &'a JobHandle,
    ) -> BoxFuture<'a, Result<ProgressSnapshot, SourceError>> {
        Box::pin(async move { self.get_json(&job.status_url()).await })
    }

    fn fetch_result<'a>(
        &'a self,
        job: &'a JobHandle,
    ) -> BoxFuture<'a, Result<JobResult, SourceError>> {
        Box::pin(async move { self.get_json(&job.result_url()).await })
    }
}
