use interfaces_github_stargazers::{
    index::{fetch_repo_stargazers, FetchRepoStargazersError, GitHubRestResult, StargazersPageRequest},
    models::StargazersPage,
};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    config::{RepositoryIdentifier, StarHistoryConfig},
    series::{CumulativeSeries, StarEvent},
};

#[derive(Debug, Error)]
pub enum BuildClientError {
    #[error("BuildClient: {source}")]
    BuildClient {
        #[from]
        source: reqwest::Error,
    },
}

/// One client per run, reused for every page of every repository.
pub fn build_client() -> Result<Client, BuildClientError> {
    Client::builder()
        .build()
        .map_err(|source| BuildClientError::BuildClient { source })
}

#[derive(Debug, Error)]
pub enum FetchPageError {
    #[error("FetchRepoStargazers: {source}")]
    FetchRepoStargazers {
        #[from]
        source: FetchRepoStargazersError,
    },

    #[error("UnexpectedStatus: {status}")]
    UnexpectedStatus {
        status: StatusCode,
        body: String,
    },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },
}

/// Fetches and decodes a single page of stargazers.
pub async fn fetch_stargazers_page(
    client: &Client,
    config: &StarHistoryConfig,
    repo: &RepositoryIdentifier,
    page: u32,
) -> Result<StargazersPage, FetchPageError> {
    let request = StargazersPageRequest {
        api_url: &config.api_url,
        token: config.token.as_deref(),
        owner: &repo.owner,
        name: &repo.name,
        page,
        per_page: config.per_page,
    };

    let GitHubRestResult { body, status } = fetch_repo_stargazers(client, &request).await?;

    if !status.is_success() {
        return Err(FetchPageError::UnexpectedStatus { status, body });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Walks the stargazer pages of `repo` and derives its cumulative series.
///
/// Never fails: a page that cannot be fetched ends pagination for this
/// repository and whatever was gathered up to that point is kept.
pub async fn fetch_star_history(
    client: &Client,
    config: &StarHistoryConfig,
    repo: &RepositoryIdentifier,
) -> CumulativeSeries {
    info!("Fetching star data for {repo}");

    let mut stars: Vec<StarEvent> = Vec::new();

    for page in 1..=config.max_pages {
        let records = match fetch_stargazers_page(client, config, repo, page).await {
            Ok(records) => records,
            Err(FetchPageError::UnexpectedStatus { status, body }) => {
                error!("Error fetching data for {repo}: {status}");
                error!("Response: {body}");
                break;
            }
            Err(err) => {
                error!("Error fetching data for {repo} (page {page}): {err}");
                break;
            }
        };

        let fetched = records.len();
        stars.extend(records.into_iter().map(|record| record.starred_at));
        info!("  Fetched page {page} ({fetched} stars)");

        if fetched < config.per_page as usize {
            break;
        }

        if page == config.max_pages {
            warn!("  Reached maximum page limit for {repo}");
        }
    }

    let series = CumulativeSeries::from_star_events(stars);
    info!("  Total stars: {}", series.len());
    series
}
