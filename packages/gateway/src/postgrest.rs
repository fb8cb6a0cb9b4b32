//! [`Gateway`] over the store's PostgREST endpoint.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::{Gateway, GatewayConfig, GatewayError, RestQuery, retry};

const PREFER: &str = "Prefer";

/// HTTP client for `{url}/rest/v1/{table}`.
#[derive(Debug, Clone)]
pub struct PostgrestGateway {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl PostgrestGateway {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        })
    }

    /// Builds a client from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if configuration is missing or the client
    /// cannot be built.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(&GatewayConfig::from_env()?)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn request(&self, method: Method, query: &RestQuery) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(query.table_name()))
            .query(&query.to_query_pairs())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

/// Extracts the total from a `Content-Range` header such as `0-24/3573`.
///
/// An unknown total (`*`) or an unparsable header counts as zero.
#[must_use]
pub fn parse_content_range_total(header: &str) -> u64 {
    header
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
        .unwrap_or(0)
}

fn into_rows(table: &str, body: Value) -> Result<Vec<Value>, GatewayError> {
    match body {
        Value::Array(rows) => Ok(rows),
        other => Err(GatewayError::Decode {
            table: table.to_string(),
            message: format!("expected a JSON array, got {other}"),
        }),
    }
}

#[async_trait]
impl Gateway for PostgrestGateway {
    async fn fetch(&self, query: &RestQuery) -> Result<Vec<Value>, GatewayError> {
        let table = query.table_name();
        log::debug!("GET {table} {:?}", query.to_query_pairs());

        let body = retry::send_json(table, || self.request(Method::GET, query)).await?;
        into_rows(table, body)
    }

    async fn count(&self, query: &RestQuery) -> Result<u64, GatewayError> {
        let response = retry::send(&|| {
            self.request(Method::HEAD, query)
                .header(PREFER, "count=exact")
        })
        .await?;

        Ok(response
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .map_or(0, parse_content_range_total))
    }

    async fn update(&self, query: &RestQuery, patch: Value) -> Result<Vec<Value>, GatewayError> {
        let table = query.table_name();
        log::info!("PATCH {table} {:?}", query.to_query_pairs());

        let body = retry::send_json(table, || {
            self.request(Method::PATCH, query)
                .header(PREFER, "return=representation")
                .json(&patch)
        })
        .await?;
        into_rows(table, body)
    }
}
