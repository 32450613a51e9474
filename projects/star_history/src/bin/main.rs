use std::process::ExitCode;

use projects_star_history::{
    config::StarHistoryConfig,
    driver::{run, RunError, RunOutcome},
};
use thiserror::Error;
use tracing::info;
use utils_trace::init as tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("Run: {source}")]
    Run {
        #[source]
        source: RunError,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, MainError> {
    dotenvy::dotenv().ok();

    tracing_init("info")
        .map_err(|source| MainError::TracingInit { source })?;

    let config = StarHistoryConfig::from_env();

    let outcome = run(&config)
        .await
        .map_err(|source| MainError::Run { source })?;

    match outcome {
        RunOutcome::Rendered { plotted, .. } => {
            info!("Star history chart generated successfully! ({plotted} repositories plotted)");
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::NoData => Ok(ExitCode::FAILURE),
    }
}
