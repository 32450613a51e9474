#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use projects_star_history::config::{RepositoryIdentifier, StarHistoryConfig};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

/// JSON body of one stargazers page, one record per entry of `days`.
pub fn stars_body(days: &[i64]) -> String {
    let records: Vec<_> = days
        .iter()
        .enumerate()
        .map(|(i, n)| {
            json!({
                "starred_at": day(*n).to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                "user": { "login": format!("user{i}") }
            })
        })
        .collect();
    serde_json::Value::Array(records).to_string()
}

pub fn config_for(server: &MockServer, repos: &[(&str, &str)]) -> StarHistoryConfig {
    StarHistoryConfig {
        repositories: repos
            .iter()
            .map(|(owner, name)| RepositoryIdentifier::new(*owner, *name))
            .collect(),
        api_url: server.uri(),
        per_page: 2,
        max_pages: 5,
        ..StarHistoryConfig::default()
    }
}

pub fn stargazers_path(owner: &str, name: &str) -> String {
    format!("/repos/{owner}/{name}/stargazers")
}

pub async fn mount_page(server: &MockServer, owner: &str, name: &str, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(stargazers_path(owner, name)))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

pub fn ok_page(days: &[i64]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(stars_body(days))
}

/// Formatted log lines written while a [`capture_logs`] guard is alive.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's `tracing` events into a buffer. `#[tokio::test]` runs on a
/// current-thread runtime, so everything awaited in the test is captured.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}
