//! [`VaultClient`] — the HTTP implementation of [`Vault`].

use std::time::Duration;

use afq_core::{
  record::Document,
  resource::{LookupFilter, Resource},
  vault::{CreateOutcome, Vault},
};
use reqwest::{
  Client, Response, StatusCode,
  header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue, IF_MATCH},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Connection settings for the vault.
#[derive(Debug, Clone)]
pub struct VaultConfig {
  /// Service root, e.g. `http://localhost`; `/api/v1` is appended.
  pub endpoint: String,
  /// Sent verbatim as `authorization: Basic <secret>`.
  pub secret:   String,
  /// Per-request timeout. `None` waits indefinitely.
  pub timeout:  Option<Duration>,
}

/// Async HTTP client for the vault REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct VaultClient {
  client:   Client,
  base_url: String,
}

/// Envelope of a collection read.
#[derive(Deserialize)]
struct Items {
  #[serde(rename = "_items", default)]
  items: Vec<Document>,
}

impl VaultClient {
  pub fn new(config: &VaultConfig) -> Result<Self> {
    let mut auth = HeaderValue::from_str(&format!("Basic {}", config.secret))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(AUTHORIZATION, auth);

    let mut builder = Client::builder().default_headers(headers);
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }

    Ok(Self {
      client:   builder.build()?,
      base_url: format!("{}/api/v1", config.endpoint.trim_end_matches('/')),
    })
  }

  fn url(&self, path: &str) -> String { format!("{}/{}", self.base_url, path) }
}

/// Read the response body, failing with [`Error::Status`] on a non-2xx code.
async fn success_body(method: &'static str, url: String, resp: Response) -> Result<String> {
  let status = resp.status();
  let body = resp.text().await?;
  if !status.is_success() {
    return Err(Error::Status {
      method,
      url,
      status: status.as_u16(),
      body,
    });
  }
  Ok(body)
}

/// Whether a rejected create was a unique-key collision rather than a real
/// failure. Eve reports these as 409, or as 422 with a "not unique" issue.
fn is_unique_conflict(status: StatusCode, body: &str) -> bool {
  status == StatusCode::CONFLICT
    || (status == StatusCode::UNPROCESSABLE_ENTITY && body.contains("not unique"))
}

impl Vault for VaultClient {
  type Error = Error;

  /// `GET /{resource}?where=<filter>`
  async fn find(&self, resource: Resource, filter: &LookupFilter) -> Result<Vec<Document>> {
    let url = self.url(resource.name);
    let clause = filter.render(resource.syntax);
    tracing::debug!(%resource, filter = %clause, "querying vault");

    let resp = self
      .client
      .get(&url)
      .query(&[("where", clause.as_str())])
      .send()
      .await?;
    let body = success_body("GET", url, resp).await?;
    let items: Items = serde_json::from_str(&body)?;
    Ok(items.items)
  }

  /// `POST /{resource}`
  async fn create(&self, resource: Resource, payload: &Value) -> Result<CreateOutcome> {
    let url = self.url(resource.name);
    let resp = self
      .client
      .post(&url)
      .body(serde_json::to_vec(payload)?)
      .send()
      .await?;

    let status = resp.status();
    if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
      let body = resp.text().await?;
      if is_unique_conflict(status, &body) {
        tracing::debug!(%resource, status = status.as_u16(), "create conflicted");
        return Ok(CreateOutcome::Conflict {
          status: status.as_u16(),
          body,
        });
      }
      return Err(Error::Status {
        method: "POST",
        url,
        status: status.as_u16(),
        body,
      });
    }

    let body = success_body("POST", url, resp).await?;
    Ok(CreateOutcome::Created(serde_json::from_str(&body)?))
  }

  /// `PATCH /{resource}/{id}` with `if-match: <etag>`
  async fn patch(
    &self,
    resource: Resource,
    id: &str,
    etag: &str,
    payload: &Value,
  ) -> Result<Document> {
    let url = self.url(&format!("{}/{id}", resource.name));
    let resp = self
      .client
      .patch(&url)
      .header(IF_MATCH, HeaderValue::from_str(etag)?)
      .body(serde_json::to_vec(payload)?)
      .send()
      .await?;
    let body = success_body("PATCH", url, resp).await?;
    Ok(serde_json::from_str(&body)?)
  }
}
