use reqwest::{header, Client, StatusCode};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Media type that makes GitHub include `starred_at` in every record.
pub const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";

pub const USER_AGENT: &str = "star-history";

pub struct GitHubRestResult {
    pub body: String,
    pub status: StatusCode,
}

/// One page of `GET /repos/{owner}/{name}/stargazers`.
pub struct StargazersPageRequest<'a> {
    pub api_url: &'a str,
    pub token: Option<&'a str>,
    pub owner: &'a str,
    pub name: &'a str,
    pub page: u32,
    pub per_page: u32,
}

impl StargazersPageRequest<'_> {
    pub fn url(&self) -> String {
        format!(
            "{}/repos/{}/{}/stargazers",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.name
        )
    }
}

/// Sends the request and returns whatever came back. The status is not
/// interpreted here, callers decide what a non-success page means.
pub async fn fetch_repo_stargazers(
    client: &Client,
    request: &StargazersPageRequest<'_>,
) -> Result<GitHubRestResult, FetchRepoStargazersError> {
    let mut builder = client
        .get(request.url())
        .query(&[("page", request.page), ("per_page", request.per_page)])
        .header(header::ACCEPT, STAR_MEDIA_TYPE)
        .header(header::USER_AGENT, USER_AGENT);

    if let Some(token) = request.token {
        builder = builder.bearer_auth(token);
    }

    let response = builder
        .send()
        .await
        .map_err(|source| FetchRepoStargazersError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| FetchRepoStargazersError::ResponseRead { source })?;

    Ok(GitHubRestResult { body, status })
}

#[derive(Debug, Error)]
pub enum FetchRepoStargazersError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request<'a>(api_url: &'a str, token: Option<&'a str>) -> StargazersPageRequest<'a> {
        StargazersPageRequest {
            api_url,
            token,
            owner: "behave",
            name: "behave",
            page: 2,
            per_page: 100,
        }
    }

    #[test]
    fn url_ignores_trailing_slash() {
        let req = request("https://api.github.com/", None);
        assert_eq!(req.url(), "https://api.github.com/repos/behave/behave/stargazers");
    }

    #[tokio::test]
    async fn sends_paging_and_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/behave/behave/stargazers"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "100"))
            .and(header("accept", STAR_MEDIA_TYPE))
            .and(header("authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let result = fetch_repo_stargazers(&Client::new(), &request(&uri, Some("s3cret")))
            .await
            .unwrap();

        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(result.body, "[]");
    }

    #[tokio::test]
    async fn non_success_status_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/behave/behave/stargazers"))
            .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let uri = server.uri();
        let result = fetch_repo_stargazers(&Client::new(), &request(&uri, None))
            .await
            .unwrap();

        assert_eq!(result.status, StatusCode::FORBIDDEN);
        assert_eq!(result.body, "rate limited");
    }

    #[tokio::test]
    async fn unauthenticated_request_has_no_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let uri = server.uri();
        fetch_repo_stargazers(&Client::new(), &request(&uri, None))
            .await
            .unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(!received[0].headers.contains_key("authorization"));
    }
}
