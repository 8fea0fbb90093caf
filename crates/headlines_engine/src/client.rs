use std::time::Duration;

use headlines_core::{Article, ArticleIdGenerator, Category};
use news_logging::{news_debug, news_warn};
use serde::Deserialize;

use crate::types::{NETWORK_ERROR, UNKNOWN_ERROR};
use crate::{FailureKind, NetworkError};

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_key: String,
    pub country: String,
    pub page_size: u32,
    /// `None` leaves the transport default in place.
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            country: "us".to_string(),
            page_size: headlines_core::PAGE_SIZE as u32,
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

/// One `top-headlines` call. `page: None` asks for the first page without
/// paging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadlineRequest {
    pub category: Option<Category>,
    pub page: Option<u32>,
}

#[async_trait::async_trait]
pub trait NewsClient: Send + Sync {
    async fn fetch_headlines(&self, request: HeadlineRequest)
        -> Result<Vec<Article>, NetworkError>;

    async fn fetch_latest(&self) -> Result<Vec<Article>, NetworkError> {
        self.fetch_headlines(HeadlineRequest::default()).await
    }

    async fn fetch_latest_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<Article>, NetworkError> {
        self.fetch_headlines(HeadlineRequest {
            category: Some(category),
            page: None,
        })
        .await
    }

    async fn fetch_latest_paginated(&self, page: u32) -> Result<Vec<Article>, NetworkError> {
        self.fetch_headlines(HeadlineRequest {
            category: None,
            page: Some(page),
        })
        .await
    }

    async fn fetch_latest_paginated_by_category(
        &self,
        page: u32,
        category: Category,
    ) -> Result<Vec<Article>, NetworkError> {
        self.fetch_headlines(HeadlineRequest {
            category: Some(category),
            page: Some(page),
        })
        .await
    }
}

/// Response envelope of the headline API, for both success and error bodies.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    total_results: Option<u64>,
    #[serde(default)]
    articles: Option<Vec<Article>>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug)]
pub struct ReqwestNewsClient {
    settings: ClientSettings,
    client: reqwest::Client,
    ids: ArticleIdGenerator,
}

impl ReqwestNewsClient {
    pub fn new(settings: ClientSettings) -> Result<Self, NetworkError> {
        let client = build_client(&settings)?;
        Ok(Self {
            settings,
            client,
            ids: ArticleIdGenerator::new(),
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn headlines_url(&self, request: HeadlineRequest) -> Result<reqwest::Url, NetworkError> {
        let base = self.settings.base_url.trim_end_matches('/');
        let mut url = reqwest::Url::parse(&format!("{base}/top-headlines"))
            .map_err(|err| NetworkError::new(FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("country", &self.settings.country);
            if let Some(category) = request.category {
                pairs.append_pair("category", category.as_query_value());
            }
            if let Some(page) = request.page {
                pairs.append_pair("page", &page.to_string());
                pairs.append_pair("pageSize", &self.settings.page_size.to_string());
            }
        }
        Ok(url)
    }
}

fn build_client(settings: &ClientSettings) -> Result<reqwest::Client, NetworkError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = settings.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = settings.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| NetworkError::new(FailureKind::Network, err.to_string()))
}

#[async_trait::async_trait]
impl NewsClient for ReqwestNewsClient {
    async fn fetch_headlines(
        &self,
        request: HeadlineRequest,
    ) -> Result<Vec<Article>, NetworkError> {
        let url = self.headlines_url(request)?;
        news_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.settings.api_key)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            // Error bodies usually carry the API's own explanation.
            let envelope = serde_json::from_slice::<Envelope>(&body).ok();
            let (message, code) = envelope
                .map(|envelope| (envelope.message, envelope.code))
                .unwrap_or_default();
            return Err(NetworkError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message.unwrap_or_else(|| NETWORK_ERROR.to_string()),
            )
            .with_code(code));
        }

        let envelope: Envelope = serde_json::from_slice(&body).map_err(|err| {
            news_warn!("Undecodable headline response: {}", err);
            NetworkError::new(FailureKind::Decode, UNKNOWN_ERROR)
        })?;

        if envelope.status.as_deref() != Some("ok") {
            return Err(NetworkError::new(
                FailureKind::Api,
                envelope.message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            )
            .with_code(envelope.code));
        }

        let mut articles = envelope.articles.unwrap_or_default();
        for article in &mut articles {
            article.id = self.ids.next();
        }
        news_debug!(
            "Received {} articles (totalResults={:?})",
            articles.len(),
            envelope.total_results
        );
        Ok(articles)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        news_warn!("Headline request timed out: {}", err);
        return NetworkError::new(FailureKind::Timeout, NETWORK_ERROR);
    }
    news_warn!("Headline request failed: {}", err);
    NetworkError::new(FailureKind::Network, NETWORK_ERROR)
}
