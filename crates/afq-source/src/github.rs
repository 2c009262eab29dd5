//! [`GitHubSource`] — commit lookup and CSV download over HTTP.

use std::time::Duration;

use afq_core::{
  source::{RepoRef, RepoSource},
  table::Table,
};
use reqwest::{Client, header::ACCEPT};
use serde_json::Value;

use crate::{Error, Result};

const USER_AGENT: &str = concat!("afq-upload/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the hosting platform.
#[derive(Debug, Clone)]
pub struct SourceConfig {
  /// GitHub REST API root, e.g. `https://api.github.com`.
  pub github_api: String,
  pub timeout:    Option<Duration>,
}

#[derive(Clone)]
pub struct GitHubSource {
  client:     Client,
  github_api: String,
}

impl GitHubSource {
  pub fn new(config: &SourceConfig) -> Result<Self> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    Ok(Self {
      client:     builder.build()?,
      github_api: config.github_api.trim_end_matches('/').to_owned(),
    })
  }
}

impl RepoSource for GitHubSource {
  type Error = Error;

  /// `GET /repos/{owner}/{repo}/commits/{branch}` and read its `sha`.
  ///
  /// Any response without a string `sha` (including error responses) yields
  /// `None`; the body is logged for diagnosis.
  async fn commit_sha(&self, repo: &RepoRef, branch: &str) -> Result<Option<String>> {
    let url = format!(
      "{}/repos/{}/{}/commits/{branch}",
      self.github_api, repo.username, repo.repository_name
    );
    let resp = self
      .client
      .get(&url)
      .header(ACCEPT, "application/vnd.github+json")
      .send()
      .await?;
    let status = resp.status().as_u16();
    let body = resp.text().await?;

    let sha = serde_json::from_str::<Value>(&body)
      .ok()
      .and_then(|v| v.get("sha").and_then(Value::as_str).map(str::to_owned));
    if sha.is_none() {
      tracing::warn!(%repo, branch, status, %body, "commit lookup returned no sha");
    }
    Ok(sha)
  }

  async fn fetch_table(&self, url: &str) -> Result<Table> {
    tracing::debug!(url, "fetching table");
    let resp = self.client.get(url).send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
      return Err(Error::Status {
        url: url.to_owned(),
        status: status.as_u16(),
        body,
      });
    }
    Ok(afq_csv::parse_table(&body)?)
  }
}

#[cfg(test)]
mod tests {
  use afq_core::table::Cell;
  use serde_json::json;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header_exists, method, path},
  };

  use super::*;

  fn source(server: &MockServer) -> GitHubSource {
    GitHubSource::new(&SourceConfig {
      github_api: server.uri(),
      timeout:    None,
    })
    .unwrap()
  }

  #[tokio::test]
  async fn reads_sha_of_branch_head() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/repos/alice/study1/commits/gh-pages"))
      .and(header_exists("user-agent"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "sha": "abc123",
        "commit": { "message": "update data" }
      })))
      .expect(1)
      .mount(&server)
      .await;

    let sha = source(&server)
      .commit_sha(&RepoRef::new("alice", "study1"), "gh-pages")
      .await
      .unwrap();
    assert_eq!(sha.as_deref(), Some("abc123"));
  }

  #[tokio::test]
  async fn missing_branch_yields_no_sha() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(404).set_body_json(json!({
        "message": "No commit found for SHA: gh-pages"
      })))
      .mount(&server)
      .await;

    let sha = source(&server)
      .commit_sha(&RepoRef::new("alice", "study1"), "gh-pages")
      .await
      .unwrap();
    assert!(sha.is_none());
  }

  #[tokio::test]
  async fn fetches_and_decodes_csv() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/study1/data/subjects.csv"))
      .respond_with(ResponseTemplate::new(200).set_body_string(",subjectID,age\n0,S01,34\n"))
      .mount(&server)
      .await;

    let url = format!("{}/study1/data/subjects.csv", server.uri());
    let table = source(&server).fetch_table(&url).await.unwrap();
    assert_eq!(table.columns, vec!["subjectID", "age"]);
    assert_eq!(table.rows[0].get("age"), Some(&Cell::Int(34)));
  }

  #[tokio::test]
  async fn missing_csv_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
      .mount(&server)
      .await;

    let url = format!("{}/study1/data/nodes.csv", server.uri());
    let err = source(&server).fetch_table(&url).await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 404, .. }));
  }
}
