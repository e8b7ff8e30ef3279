mod cli;

use crate::cli::{Cli, Commands};
use import_tracker::{
    config::Config,
    core::settings,
    error::{PollRequest, TrackerError},
    http::{BatchUpload, HttpJobSource},
    models::{job::JobHandle, progress::ProgressSnapshot, summary_status::SummaryStatus},
    tracker::{ChannelListener, JobSource, Tracker, TrackerEvent},
    widgets::{progress_info, summary},
};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::{io::Write, path::Path, process::ExitCode};

const EXIT_PARTIAL_FAILURE: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    settings::init(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.instance, cli.interval_ms);
    let source = HttpJobSource::new(&config)?;

    match cli.command {
        Commands::Import {
            endpoint,
            file,
            columns,
            encoding,
            quiet,
        } => {
            let endpoint = config.endpoint_url(&endpoint)?;
            let upload = read_upload(&file, columns, encoding, quiet).await?;
            println!("Uploading {}...", upload.file_name);
            let job = source.submit_batch(&endpoint, upload).await?;
            println!("Processing job {}...", job.job_id);
            watch(source, job, &config).await
        }
        Commands::Watch { endpoint, job } => {
            let job = JobHandle::new(config.endpoint_url(&endpoint)?, job);
            watch(source, job, &config).await
        }
        Commands::Result {
            endpoint,
            job,
            json,
        } => {
            let job = JobHandle::new(config.endpoint_url(&endpoint)?, job);
            let result = source
                .fetch_result(&job)
                .await
                .map_err(|error| TrackerError::PollFailed {
                    job: job.clone(),
                    request: PollRequest::Result,
                    source: error,
                })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", summary::result_summary(&result));
            }
            Ok(exit_code(result.summary_status()))
        }
    }
}

async fn read_upload(
    file: &Path,
    columns: Vec<String>,
    encoding: Option<String>,
    quiet: bool,
) -> Result<BatchUpload> {
    let content = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "import.csv".to_string());
    Ok(BatchUpload {
        file_name,
        content,
        columns,
        encoding,
        quiet,
    })
}

fn exit_code(status: SummaryStatus) -> ExitCode {
    ExitCode::from(exit_status(status))
}

fn exit_status(status: SummaryStatus) -> u8 {
    match status {
        SummaryStatus::Successful | SummaryStatus::InProgress => 0,
        SummaryStatus::PartiallyFailed | SummaryStatus::Failed => EXIT_PARTIAL_FAILURE,
    }
}

fn print_progress(snapshot: &ProgressSnapshot) {
    let info = progress_info::ProgressInfo::from_snapshot("Importing", snapshot);
    print!("\r{}", progress_info::operation_progress_line(&info));
    // NOTE: a failed flush only delays the redraw
    let _ = std::io::stdout().flush();
}

/// Follows `job` until it completes, fails, or the user interrupts.
async fn watch(source: HttpJobSource, job: JobHandle, config: &Config) -> Result<ExitCode> {
    let mut tracker = Tracker::with_interval(source, config.poll_interval());
    let (listener, mut events) = ChannelListener::new();
    tracker.start(job, listener);
    let mut last_snapshot: Option<ProgressSnapshot> = None;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(TrackerEvent::Progress(snapshot)) => {
                    print_progress(&snapshot);
                    last_snapshot = Some(snapshot);
                }
                Some(TrackerEvent::Complete(result)) => {
                    println!();
                    println!("{}", summary::result_summary(&result));
                    return Ok(exit_code(result.summary_status()));
                }
                Some(TrackerEvent::Failed(error)) => {
                    println!();
                    if let Some(snapshot) = &last_snapshot {
                        println!("{}", summary::snapshot_summary(snapshot));
                    }
                    return Err(error.into());
                }
                None => return Err(anyhow!("tracking stopped without a result")),
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                if let Some(job) = tracker.job() {
                    eprintln!("Stopped watching {job}, the import keeps running on the server");
                }
                tracker.cancel();
                return Ok(ExitCode::from(EXIT_INTERRUPTED));
            }
        }
    }
}
