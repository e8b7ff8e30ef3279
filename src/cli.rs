use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "import-tracker",
    version,
    about = "Submit identity batch imports and follow them to completion"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Base URL relative endpoints are resolved against"
    )]
    pub instance: Option<String>,

    #[arg(long, global = true, help = "Delay between two status polls, in milliseconds")]
    pub interval_ms: Option<u64>,

    #[arg(short, long, global = true, help = "Log at info level")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a CSV file and track the created job
    Import {
        #[arg(long, help = "Batch endpoint, e.g. service/id/user/batch/full")]
        endpoint: String,

        #[arg(long, help = "CSV file without header")]
        file: PathBuf,

        #[arg(long = "column", help = "Ordered CSV column, repeat for each column")]
        columns: Vec<String>,

        #[arg(long, help = "CSV encoding, UTF-8 when omitted")]
        encoding: Option<String>,

        #[arg(long, help = "Ask the server not to send notifications")]
        quiet: bool,
    },
    /// Track a job submitted earlier
    Watch {
        #[arg(long, help = "Batch endpoint the job was submitted to")]
        endpoint: String,

        #[arg(long, help = "Job identifier")]
        job: String,
    },
    /// Fetch the result of a job once, without polling
    Result {
        #[arg(long, help = "Batch endpoint the job was submitted to")]
        endpoint: String,

        #[arg(long, help = "Job identifier")]
        job: String,

        #[arg(long, help = "Print the raw result as JSON")]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_import_with_repeated_columns() {
        let cli = Cli::try_parse_from([
            "import-tracker",
            "--instance",
            "https://idm.example/rest",
            "import",
            "--endpoint",
            "service/id/user/batch/atomic",
            "--file",
            "users.csv",
            "--column",
            "user",
            "--column",
            "operation",
            "--quiet",
        ])
        .unwrap();
        assert_eq!(cli.instance.as_deref(), Some("https://idm.example/rest"));
        match cli.command {
            Commands::Import {
                endpoint,
                columns,
                quiet,
                encoding,
                ..
            } => {
                assert_eq!(endpoint, "service/id/user/batch/atomic");
                assert_eq!(columns, vec!["user", "operation"]);
                assert!(quiet);
                assert!(encoding.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "import-tracker",
            "watch",
            "--endpoint",
            "service/id/group/batch",
            "--job",
            "1700000000000",
            "--interval-ms",
            "250",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.interval_ms, Some(250));
        assert!(cli.verbose);
    }

    #[test]
    fn watch_requires_a_job() {
        assert!(Cli::try_parse_from([
            "import-tracker",
            "watch",
            "--endpoint",
            "service/id/group/batch"
        ])
        .is_err());
    }
}
