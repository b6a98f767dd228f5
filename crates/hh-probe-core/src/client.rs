//! HTTP client for the hh.ru `vacancies` endpoint

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::config::ProbeConfig;
use crate::credential::ApiKey;
use crate::error::{ProbeError, Result};

/// A single `GET /vacancies` request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VacancyQuery {
    /// Value of the `text` search parameter
    pub text: String,
    /// Extra query parameters, sent after `text`
    pub params: Vec<(String, String)>,
    /// Header overrides, replacing defaults of the same name
    pub headers: Vec<(String, String)>,
}

impl VacancyQuery {
    /// Create a query for the given search text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Add a query parameter
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Override a request header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Query string pairs in send order
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        std::iter::once(("text", self.text.as_str()))
            .chain(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .collect()
    }
}

/// Status and body of an API response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body, if the body was valid JSON
    pub json: Option<Value>,
    /// Raw response body
    pub text: String,
}

impl ApiResponse {
    /// Build a response from a status and raw body
    pub fn new(status: u16, text: String) -> Self {
        let json = serde_json::from_str::<Value>(&text).ok();
        Self { status, json, text }
    }

    /// Look up a top-level body field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.json.as_ref().and_then(|body| body.get(name))
    }

    /// Total number of matching vacancies
    pub fn found(&self) -> Option<u64> {
        self.field("found").and_then(Value::as_u64)
    }

    /// Number of entries in the `items` array
    pub fn items_len(&self) -> Option<usize> {
        self.field("items").and_then(Value::as_array).map(Vec::len)
    }
}

/// Client for the hh.ru API
pub struct HhClient {
    client: Client,
    vacancies_url: Url,
    api_key: ApiKey,
}

impl HhClient {
    /// Create a new client from probe configuration
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ProbeError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            vacancies_url: config.vacancies_url()?,
            api_key: config.api_key.clone(),
        })
    }

    /// URL requests are sent to
    pub fn vacancies_url(&self) -> &Url {
        &self.vacancies_url
    }

    /// Headers for a query: bearer auth, then the query's overrides
    fn headers_for(&self, query: &VacancyQuery) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&self.api_key.bearer())
            .map_err(|_| ProbeError::InvalidConfig("API key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        for (name, value) in &query.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ProbeError::InvalidConfig(format!("Invalid header name: {}", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ProbeError::InvalidConfig(format!("Invalid value for header {}", name)))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    /// Issue `GET /vacancies` for the query
    ///
    /// Non-success statuses are returned as responses; only transport
    /// failures are errors.
    pub async fn vacancies(&self, query: &VacancyQuery) -> Result<ApiResponse> {
        let headers = self.headers_for(query)?;

        info!("GET {} text={:?}", self.vacancies_url, query.text);
        debug!("Extra params: {:?}", query.params);

        let response = self
            .client
            .get(self.vacancies_url.clone())
            .headers(headers)
            .query(&query.query_pairs())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        debug!("Response status: {}, {} bytes", status, text.len());

        Ok(ApiResponse::new(status.as_u16(), text))
    }
}
