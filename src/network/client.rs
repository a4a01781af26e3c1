//! HTTP client for making requests to the server's OCS API

use super::error::RequestError;
use super::traits::{ApiRequest, ApiResponse, RequestExecutor, STATUS_OK};
use crate::account::Account;
use crate::config::OutgoingSettings;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// HTTP client bound to one account
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    account: Arc<Account>,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new(account: Arc<Account>) -> Result<Self> {
        Self::with_settings(account, &OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(account: Arc<Account>, settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let user_agent = format!("Mozilla/5.0 (unified-search) unified-search/{}", crate::VERSION);
        debug!("HTTP client for {} as {}", account.server_url(), user_agent);

        Ok(Self {
            client: builder.build()?,
            account,
            user_agent,
        })
    }

    /// Parse response into ApiResponse
    async fn parse_response(response: Response) -> Result<ApiResponse, RequestError> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        // error pages are often not JSON; only a 200 must decode
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(body) => body,
            Err(e) if status == STATUS_OK => return Err(RequestError::Decode(e.to_string())),
            Err(_) => Value::Null,
        };

        Ok(ApiResponse::new(status, body))
    }
}

#[async_trait]
impl RequestExecutor for HttpClient {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, RequestError> {
        let url = self.account.endpoint(&request.path)?;
        debug!("GET {} {:?}", url, request.params);

        let mut req_builder = self
            .client
            .get(url)
            .query(&[("format", "json")])
            .query(&request.params)
            .header("OCS-APIRequest", "true")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent);

        if let Some(password) = self.account.app_password() {
            req_builder = req_builder.basic_auth(self.account.user(), Some(password));
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }
}
