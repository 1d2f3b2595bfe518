use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use evidence_engine::ClientSettings;

use super::logging::LogDestination;

/// Upload evidence to the ingestion backend and manage the active workspace.
#[derive(Debug, Parser)]
#[command(name = "evidence", version)]
pub struct Cli {
    /// Base URL of the backend API.
    #[arg(long, env = "EVIDENCE_API_BASE_URL", default_value = "http://127.0.0.1:8000")]
    pub api_base: String,

    /// Seconds between status polls for a running job.
    #[arg(long, env = "EVIDENCE_POLL_INTERVAL_SECS", default_value_t = 5)]
    pub poll_interval_secs: u64,

    /// Seconds allowed for a status or workspace request.
    #[arg(long, env = "EVIDENCE_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Seconds allowed for one whole upload; unlimited when omitted.
    #[arg(long, env = "EVIDENCE_UPLOAD_TIMEOUT_SECS")]
    pub upload_timeout_secs: Option<u64>,

    /// Directory for the saved workspace and the log file.
    #[arg(long, env = "EVIDENCE_STATE_DIR", default_value = ".evidence")]
    pub state_dir: PathBuf,

    #[arg(long, env = "EVIDENCE_LOG", value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload files or folders and follow their ingestion until done.
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Give up after this many seconds even if jobs are still running.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Manage the active case.
    #[command(subcommand)]
    Case(CaseCommand),
    /// Select the halo module (and optionally its submodule).
    Module {
        module: String,
        submodule: Option<String>,
    },
    /// Print the saved workspace.
    Show,
    /// Pull the current case and halo selection from the backend.
    Bootstrap,
}

#[derive(Debug, Subcommand)]
pub enum CaseCommand {
    Set { id: String },
    Clear,
    /// Replace the permission list.
    Permissions { permissions: Vec<String> },
}

impl Cli {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base.clone(),
            poll_interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            upload_timeout: self
                .upload_timeout_secs
                .map(|secs| Duration::from_secs(secs.max(1))),
            ..ClientSettings::default()
        }
    }
}
