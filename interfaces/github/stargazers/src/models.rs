use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One element of the stargazers array when requested with the star media type.
#[derive(Debug, Clone, Deserialize)]
pub struct StargazerRecord {
    pub starred_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<Stargazer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stargazer {
    pub login: String,
}

pub type StargazersPage = Vec<StargazerRecord>;
