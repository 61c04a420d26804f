use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::CrawlConfig;
use crate::document::Document;
use crate::error::ScraperError;
use crate::retry::RetryPolicy;
use crate::traits::Fetcher;

/// reqwest による HTTP 取得
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScraperError::ClientInit(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScraperError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        // ステータスは判定に使わない（空の結果として扱われる）
        debug!("GET {} -> {} ({}bytes)", url, status, body.len());
        Ok(body.to_vec())
    }
}

/// 1ページを取得してパースする（通信失敗時は指数バックオフでリトライ）
#[derive(Clone)]
pub struct PageFetcher {
    fetcher: Arc<dyn Fetcher>,
    retry: RetryPolicy,
}

impl PageFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher>, retry: RetryPolicy) -> Self {
        Self { fetcher, retry }
    }

    pub async fn fetch(&self, url: &str) -> Result<Document, ScraperError> {
        info!("ページ取得: {}", url);
        let bytes = self.retry.retry(|| self.fetcher.fetch(url)).await?;
        Ok(Document::parse(&bytes))
    }
}
