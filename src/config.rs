use std::time::Duration;

use url::Url;

use crate::error::ScraperError;
use crate::retry::RetryPolicy;

/// SUUMO 賃貸一覧の検索ページ
pub const SUUMO_BASE_URL: &str = "https://suumo.jp/jj/chintai/ichiran/FR301FC001/";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// ページ取得ごとの待機時間
    pub courtesy_delay: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: SUUMO_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
            courtesy_delay: Duration::from_secs(1),
        }
    }
}

impl CrawlConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_courtesy_delay(mut self, delay: Duration) -> Self {
        self.courtesy_delay = delay;
        self
    }

    /// 検索ページのURLを解釈する（クロール開始前に不正な設定を弾く）
    pub fn parse_base_url(&self) -> Result<Url, ScraperError> {
        Url::parse(&self.base_url).map_err(|e| {
            ScraperError::InvalidConfig(format!("base_url {:?}: {}", self.base_url, e))
        })
    }
}
