use crate::config::AppConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Executes a GraphQL document and hands back the reply's `data` object.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value>;
}

pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_url(config.endpoint())
    }

    fn with_url(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

/// The endpoint URL carries the API key, so it is stripped from transport errors.
fn redact(err: reqwest::Error) -> AppError {
    AppError::Http(err.without_url())
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value> {
        let request = GraphQlRequest {
            query,
            variables: &variables,
        };

        let res = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(redact)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply = res.json::<GraphQlResponse>().await.map_err(redact)?;
        unpack_response(reply)
    }
}

fn unpack_response(reply: GraphQlResponse) -> Result<Value> {
    if let Some(errors) = reply.errors.filter(|errors| !errors.is_empty()) {
        let combined = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::GraphQl(combined));
    }

    reply.data.ok_or(AppError::MissingData)
}

pub struct SubgraphClient<T = HttpTransport> {
    transport: T,
}

impl SubgraphClient<HttpTransport> {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(HttpTransport::new(config))
    }
}

impl<T: GraphQlTransport> SubgraphClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub async fn query<R: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<R> {
        tracing::debug!(operation, %variables, "querying subgraph");
        let data = self.transport.execute(query, variables).await?;
        Ok(serde_json::from_value(data)?)
    }
}

/// Subgraph BigDecimal and BigInt values are serialized as JSON strings.
pub fn parse_decimal(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
