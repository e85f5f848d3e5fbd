//! GitHub API client: REST label endpoints and the generic GraphQL boundary.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::Error;

/// User agent sent on every API request.
const USER_AGENT_VALUE: &str = concat!("issue-triage/", env!("CARGO_PKG_VERSION"));

/// GitHub API client bound to one bearer token.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    graphql_url: String,
}

impl GitHubClient {
    /// Create a client with the given token and endpoints.
    pub fn new(token: &str, api_base: &str, graphql_url: &str) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| Error::Configuration("token contains invalid header characters"))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            graphql_url: graphql_url.to_string(),
        })
    }

    /// Labels currently on the issue.
    pub async fn list_labels(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<String>, Error> {
        #[derive(Deserialize)]
        struct LabelName {
            name: String,
        }

        let url = format!("{}/repos/{owner}/{repo}/issues/{number}/labels", self.api_base);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteLookup(format!(
                "label listing returned {status}: {body}"
            )));
        }

        let labels: Vec<LabelName> = response.json().await?;
        Ok(labels.into_iter().map(|label| label.name).collect())
    }

    /// Add labels to the issue. Labels already present are left untouched by
    /// the endpoint, so the call is safe to repeat.
    pub async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        if labels.is_empty() {
            return Ok(());
        }

        let url = format!("{}/repos/{owner}/{repo}/issues/{number}/labels", self.api_base);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "labels": labels }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteLookup(format!(
                "label add returned {status}: {body}"
            )));
        }
        Ok(())
    }

    /// Execute a GraphQL query and return its `data` payload.
    ///
    /// Both transport failures and the response `errors` array surface as
    /// failures; partial data alongside errors is not trusted.
    pub async fn graphql(&self, query: &'static str, variables: Value) -> Result<Value, Error> {
        let response = self
            .http
            .post(&self.graphql_url)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteLookup(format!(
                "GraphQL endpoint returned {status}: {body}"
            )));
        }

        let body: Value = response.json().await?;
        if let Some(errors) = body.get("errors").filter(|e| !e.as_array().is_some_and(Vec::is_empty)) {
            return Err(Error::RemoteLookup(format!("GraphQL query failed: {errors}")));
        }
        body.get("data")
            .filter(|data| !data.is_null())
            .cloned()
            .ok_or_else(|| Error::RemoteLookup("GraphQL response carried no data".to_string()))
    }
}
