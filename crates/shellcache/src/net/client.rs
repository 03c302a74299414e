use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};

use super::error::FetchError;
use super::types::{FetchRequest, FetchResponse, ResponseSource};
use super::Fetch;

/// HTTP request timeout in seconds.
/// 30s allows for slow asset hosts while failing fast enough that the
/// offline fallbacks still feel responsive.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Network backend over reqwest.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| FetchError::InvalidRequest(format!("bad method: {}", request.method)))?;

        let mut req = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            req = req.header(name, value);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await?;

        Ok(FetchResponse {
            url,
            status,
            headers,
            body,
            source: ResponseSource::Network,
        })
    }
}
