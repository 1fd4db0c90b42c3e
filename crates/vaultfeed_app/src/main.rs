//! `vaultfeed`: one discovery run over the catalog per invocation.
//!
//! Meant to be driven by an external scheduler that never overlaps runs; the
//! entry store has no locking.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use log::LevelFilter;
use vaultfeed_engine::{Pipeline, PipelineConfig, RunSummary};
use vaultfeed_logging::{feed_error, feed_info, feed_warn, LogDestination};

/// Optional log file in addition to stderr.
const LOG_FILE_ENV: &str = "VAULTFEED_LOG_FILE";

fn main() -> ExitCode {
    // A missing .env is the normal case.
    let dotenv = dotenvy::dotenv();

    vaultfeed_logging::initialize(log_destination(), LevelFilter::Info);
    if let Err(err) = &dotenv {
        if !err.not_found() {
            feed_warn!("Ignoring unreadable .env file: {}", err);
        }
    }

    let config = PipelineConfig::from_env();
    match run(config) {
        Ok(summary) => {
            feed_info!(
                "Run complete: {} new show(s), {} new movie(s), {} skipped",
                summary.novel.shows.len(),
                summary.novel.movies.len(),
                summary.skipped
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            feed_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: PipelineConfig) -> anyhow::Result<RunSummary> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let pipeline = Pipeline::new(config);
    let store_path = pipeline.config().store_path.clone();

    runtime.block_on(pipeline.run()).map_err(|err| {
        let stage = err.stage();
        if !stage.may_have_written_store() {
            feed_info!("Entry store {:?} was not modified", store_path);
        }
        anyhow::Error::new(err).context(format!("pipeline failed while {stage}"))
    })
}

fn log_destination() -> LogDestination {
    match std::env::var(LOG_FILE_ENV) {
        Ok(path) if !path.trim().is_empty() => LogDestination::StderrAndFile(PathBuf::from(path)),
        _ => LogDestination::Stderr,
    }
}
