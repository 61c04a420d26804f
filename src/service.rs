use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tower::Service;
use tracing::info;

use crate::config::CrawlConfig;
use crate::crawl::{CrawlEvent, CrawlOrchestrator};
use crate::dedup::{analyze, DuplicateSummary};
use crate::error::ScraperError;
use crate::fetch::HttpFetcher;
use crate::suumo::{ListingRecord, SearchFilter};
use crate::traits::Fetcher;

/// クロール結果と重複集計
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// 取得した全レコード（重複を含む）
    pub records: Vec<ListingRecord>,
    /// SUUMO上の表示物件数
    pub site_reported_total: u64,
    pub duplicates: DuplicateSummary,
    pub pages_done: u32,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SUUMOでの表示物件数: {}", self.site_reported_total)?;
        writeln!(f, "収集できた全物件数: {}", self.records.len())?;
        writeln!(f, "重複物件の数: {}", self.duplicates.duplicate_count)?;
        write!(
            f,
            "重複を取り除いた本来の物件数: {}",
            self.duplicates.unique_count
        )
    }
}

/// tower::Serviceを実装したクロールサービス
#[derive(Clone)]
pub struct CrawlService {
    fetcher: Arc<dyn Fetcher>,
    config: CrawlConfig,
    events: Option<UnboundedSender<CrawlEvent>>,
    cancel: CancellationToken,
}

impl CrawlService {
    /// HTTPで取得するサービスを作成
    pub fn new(config: CrawlConfig) -> Result<Self, ScraperError> {
        config.parse_base_url()?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config))
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            config,
            events: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_events(mut self, events: UnboundedSender<CrawlEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Service<SearchFilter> for CrawlService {
    type Response = CrawlReport;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, filter: SearchFilter) -> Self::Future {
        info!(
            "クロールリクエスト受信: 町域={:?}, 最大{}ページ",
            filter.town_codes, filter.max_pages
        );

        let fetcher = self.fetcher.clone();
        let config = self.config.clone();
        let events = self.events.clone();
        let cancel = self.cancel.clone();

        Box::pin(async move {
            filter.validate()?;

            let mut crawl = CrawlOrchestrator::new(fetcher, &config)?.with_cancellation(cancel);
            if let Some(events) = events {
                crawl = crawl.with_events(events);
            }

            let started_at = Utc::now();
            let outcome = crawl.run(&filter).await?;
            let duplicates = analyze(&outcome.records);

            let report = CrawlReport {
                records: outcome.records,
                site_reported_total: outcome.site_reported_total,
                duplicates,
                pages_done: outcome.pages_done,
                cancelled: outcome.cancelled,
                started_at,
                finished_at: Utc::now(),
            };

            info!(
                "集計完了: 全{}件, 重複{}件, 重複除去後{}件",
                report.records.len(),
                report.duplicates.duplicate_count,
                report.duplicates.unique_count
            );

            Ok(report)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{building, page, room_row, Room, ScriptedFetcher};
    use std::time::Duration;

    const DETAILS: &[&str] = &["築10年", "5階建"];

    fn reposted_page() -> String {
        let row = || room_row(&Room::new("3階", "12.5万円"));
        page(
            &[
                building("グランドメゾン本郷", "東京都文京区本郷３", DETAILS, &[row()]),
                building("本郷三丁目の1K", "東京都文京区本郷３", DETAILS, &[row()]),
                building(
                    "コート小石川",
                    "東京都文京区小石川２",
                    &["築25年", "8階建"],
                    &[room_row(&Room::new("1階", "8万円"))],
                ),
            ],
            Some("3件"),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_returns_report_with_duplicates() {
        let fake = Arc::new(ScriptedFetcher::new(vec![
            ScriptedFetcher::html(&reposted_page()),
            ScriptedFetcher::html(&reposted_page()),
        ]));
        let mut service = CrawlService::with_fetcher(fake, CrawlConfig::default());
        let filter = SearchFilter::from_town_names(["本郷", "小石川"], 7.0, 15.0)
            .unwrap()
            .with_max_pages(1);

        let report = service.call(filter).await.unwrap();

        assert_eq!(report.records.len(), 3);
        assert_eq!(report.site_reported_total, 3);
        assert_eq!(report.duplicates.duplicate_mask, vec![true, true, false]);
        assert_eq!(report.duplicates.duplicate_count, 2);
        assert_eq!(report.duplicates.unique_count, 2);
        assert_eq!(report.duplicates.deduplicated[0].name, "グランドメゾン本郷");
        assert!(report.finished_at >= report.started_at);
        assert_eq!(
            report.to_string(),
            "SUUMOでの表示物件数: 3\n収集できた全物件数: 3\n重複物件の数: 2\n重複を取り除いた本来の物件数: 2"
        );
    }

    #[tokio::test]
    async fn test_invalid_filter_is_rejected_before_fetching() {
        let fake = Arc::new(ScriptedFetcher::new(vec![]));
        let mut service = CrawlService::with_fetcher(fake.clone(), CrawlConfig::default());

        let result = service
            .call(SearchFilter::new(Vec::<String>::new(), 7.0, 15.0))
            .await;

        assert!(matches!(result, Err(ScraperError::InvalidFilter(_))));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_rejected_before_fetching() {
        let fake = Arc::new(ScriptedFetcher::new(vec![]));
        let config = CrawlConfig::default().with_base_url("not a url");
        let mut service = CrawlService::with_fetcher(fake.clone(), config.clone());

        let result = service.call(SearchFilter::new(["13105001"], 7.0, 15.0)).await;

        assert!(matches!(result, Err(ScraperError::InvalidConfig(_))));
        assert!(fake.calls().is_empty());
        assert!(matches!(
            CrawlService::new(config),
            Err(ScraperError::InvalidConfig(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_propagates_transport_failure() {
        let fake = Arc::new(ScriptedFetcher::new(vec![
            ScriptedFetcher::transport_error(),
            ScriptedFetcher::transport_error(),
        ]));
        let config = CrawlConfig::default().with_retry_policy(crate::retry::RetryPolicy::new(
            2,
            Duration::from_secs(1),
            2,
        ));
        let mut service = CrawlService::with_fetcher(fake.clone(), config);

        let result = service
            .call(SearchFilter::new(["13105001"], 7.0, 15.0).with_max_pages(2))
            .await;

        assert!(matches!(result, Err(ScraperError::Transport(_))));
        assert_eq!(fake.calls().len(), 2);
    }

    #[tokio::test]
    #[ignore] // 実環境テスト用: cargo test test_live_crawl -- --ignored --nocapture
    async fn test_live_crawl() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info,suumo_scraper=debug")
            .try_init();

        let mut service = CrawlService::new(CrawlConfig::default()).expect("client");
        let filter = SearchFilter::from_town_names(["本郷"], 7.0, 15.0)
            .unwrap()
            .with_max_pages(1);

        let report = service.call(filter).await.expect("crawl failed");
        println!("{}", report);
    }
}
