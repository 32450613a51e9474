use std::{env, fmt, path::PathBuf};

use interfaces_github_stargazers::index::DEFAULT_API_URL;

use crate::chart::ChartConfig;

/// Repositories charted on every run, in legend order.
pub const REPOSITORIES: &[(&str, &str)] = &[
    ("bittner", "pyclean"),
    ("painless-software", "python-cli-test-helpers"),
    ("painless-software", "django-probes"),
    ("behave", "behave-django"),
    ("jazzband", "django-analytical"),
    ("behave", "behave"),
];

pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
pub const API_URL_ENV_VAR: &str = "GITHUB_API_URL";

pub const PER_PAGE: u32 = 100;
/// 100 pages of 100 caps each repository at 10,000 stars.
pub const MAX_PAGES: u32 = 100;

pub const OUTPUT_FILE: &str = "star-history/star-history.svg";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryIdentifier {
    pub owner: String,
    pub name: String,
}

impl RepositoryIdentifier {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything a run needs. `Default` gives the built-in repository list with no
/// credential; `from_env` layers the process environment on top.
#[derive(Debug, Clone)]
pub struct StarHistoryConfig {
    pub repositories: Vec<RepositoryIdentifier>,
    pub token: Option<String>,
    pub api_url: String,
    pub per_page: u32,
    pub max_pages: u32,
    pub output_file: PathBuf,
    pub chart: ChartConfig,
}

impl Default for StarHistoryConfig {
    fn default() -> Self {
        Self {
            repositories: REPOSITORIES
                .iter()
                .map(|(owner, name)| RepositoryIdentifier::new(*owner, *name))
                .collect(),
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            per_page: PER_PAGE,
            max_pages: MAX_PAGES,
            output_file: PathBuf::from(OUTPUT_FILE),
            chart: ChartConfig::default(),
        }
    }
}

impl StarHistoryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let defaults = Self::default();
        Self {
            token: non_empty(TOKEN_ENV_VAR),
            api_url: non_empty(API_URL_ENV_VAR).unwrap_or(defaults.api_url.clone()),
            ..defaults
        }
    }
}
