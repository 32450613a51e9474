use std::path::PathBuf;

use reqwest::Client;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    chart::{render_star_history, RenderChartError},
    config::{StarHistoryConfig, TOKEN_ENV_VAR},
    fetcher::{build_client, fetch_star_history, BuildClientError},
    series::StarHistory,
};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("BuildClient: {source}")]
    BuildClient {
        #[from]
        source: BuildClientError,
    },

    #[error("RenderChart: {source}")]
    RenderChart {
        #[from]
        source: RenderChartError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// At least one repository had stars and the chart was written.
    Rendered { path: PathBuf, plotted: usize },
    /// Every repository came back empty, nothing was written.
    NoData,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Rendered { .. })
    }
}

/// Fetches every configured repository one after the other.
pub async fn collect_star_history(client: &Client, config: &StarHistoryConfig) -> StarHistory {
    let mut history = StarHistory::with_capacity(config.repositories.len());

    for repo in &config.repositories {
        let series = fetch_star_history(client, config, repo).await;
        history.push((repo.clone(), series));
    }

    history
}

pub async fn run(config: &StarHistoryConfig) -> Result<RunOutcome, RunError> {
    if config.token.is_none() {
        warn!("{TOKEN_ENV_VAR} not set. API rate limits will be restrictive.");
        warn!("Set {TOKEN_ENV_VAR} environment variable for better rate limits.");
    }

    let client = build_client()?;
    let history = collect_star_history(&client, config).await;

    let plotted = history.iter().filter(|(_, series)| !series.is_empty()).count();
    if plotted == 0 {
        error!("No data fetched for any repository.");
        return Ok(RunOutcome::NoData);
    }

    render_star_history(&history, &config.chart, &config.output_file)?;
    info!("Chart saved to {}", config.output_file.display());

    Ok(RunOutcome::Rendered {
        path: config.output_file.clone(),
        plotted,
    })
}
