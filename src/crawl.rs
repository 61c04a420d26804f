//! ページ送りしながら一覧を順に取得する
//!
//! 1ページずつ逐次取得する（並行取得はしない）。各ページの所要時間から残り時間を見積もり、
//! 進捗をイベントとして呼び出し側へ送る。

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use url::Url;

use crate::config::CrawlConfig;
use crate::error::ScraperError;
use crate::fetch::PageFetcher;
use crate::suumo::{build_search_url, extract_records, total_count, ListingRecord, SearchFilter};
use crate::traits::Fetcher;

/// クロールの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrawlState {
    Idle,
    Running,
    Completed,
    /// 取得失敗で中断
    Aborted,
    /// 呼び出し側の要求で停止
    Cancelled,
}

/// 残り時間の見積もり
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Eta {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Eta {
    pub fn from_duration(remaining: Duration) -> Self {
        let total = remaining.as_secs();
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}時間{}分{}秒", self.hours, self.minutes, self.seconds)
    }
}

/// 1ページ処理するごとの進捗
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlProgress {
    pub page: u32,
    pub max_pages: u32,
    /// 0.0〜1.0
    pub fraction: f64,
    pub records_so_far: usize,
    pub eta: Eta,
}

impl fmt::Display for CrawlProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "総取得件数：{}  残り時間：{}",
            self.records_so_far, self.eta
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CrawlEvent {
    Progress(CrawlProgress),
    Completed {
        total_records: usize,
        site_reported_total: u64,
    },
}

/// クロール結果
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub records: Vec<ListingRecord>,
    /// 1ページ目に表示された該当物件数
    pub site_reported_total: u64,
    pub pages_done: u32,
    pub cancelled: bool,
}

pub struct CrawlOrchestrator {
    pages: PageFetcher,
    base_url: Url,
    courtesy_delay: Duration,
    events: Option<UnboundedSender<CrawlEvent>>,
    cancel: CancellationToken,

    state: CrawlState,
    records: Vec<ListingRecord>,
    page_times: Vec<Duration>,
    site_reported_total: u64,
}

impl CrawlOrchestrator {
    /// ベースURLが解釈できなければ `ScraperError::InvalidConfig`
    pub fn new(fetcher: Arc<dyn Fetcher>, config: &CrawlConfig) -> Result<Self, ScraperError> {
        Ok(Self {
            pages: PageFetcher::new(fetcher, config.retry),
            base_url: config.parse_base_url()?,
            courtesy_delay: config.courtesy_delay,
            events: None,
            cancel: CancellationToken::new(),
            state: CrawlState::Idle,
            records: Vec::new(),
            page_times: Vec::new(),
            site_reported_total: 0,
        })
    }

    /// 進捗イベントの送り先
    pub fn with_events(mut self, events: UnboundedSender<CrawlEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// ページの合間に確認する停止要求
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// これまでに集めたレコード（完了時は結果へ移動済み）
    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn page_times(&self) -> &[Duration] {
        &self.page_times
    }

    /// 1ページ目から `max_pages` まで順に取得する。
    ///
    /// 取得に失敗したページがあればその時点で中断し、エラーを返す。
    pub async fn run(&mut self, filter: &SearchFilter) -> Result<CrawlOutcome, ScraperError> {
        self.state = CrawlState::Running;
        self.records.clear();
        self.page_times.clear();
        self.site_reported_total = 0;

        let max_pages = filter.max_pages;
        info!(
            "クロール開始: 町域{}件, 賃料{}〜{}万円, 最大{}ページ",
            filter.town_codes.len(),
            filter.min_price,
            filter.max_price,
            max_pages
        );

        let mut pages_done = 0;
        for page in 1..=max_pages {
            if self.cancel.is_cancelled() {
                info!("停止要求によりクロールを終了: {}ページ取得済み", pages_done);
                self.state = CrawlState::Cancelled;
                return Ok(self.finish(pages_done, true));
            }

            let started = Instant::now();
            let url = build_search_url(&self.base_url, filter, page);

            let found = match self.fetch_records(&url).await {
                Ok(records) => records,
                Err(e) => return Err(self.abort(page, e)),
            };
            let found_count = found.len();
            self.records.extend(found);

            if page == 1 && found_count > 0 {
                match self.fetch_total_count(&url).await {
                    Ok(total) => self.site_reported_total = total,
                    Err(e) => return Err(self.abort(page, e)),
                }
            }

            sleep(self.courtesy_delay).await;
            self.page_times.push(started.elapsed());
            pages_done = page;

            let progress = self.progress(page, max_pages);
            info!(
                "ページ {}/{} 完了: {}件 ({})",
                page, max_pages, found_count, progress
            );
            self.emit(CrawlEvent::Progress(progress));
        }

        self.state = CrawlState::Completed;
        let outcome = self.finish(pages_done, false);
        info!(
            "クロール完了: {}件取得 (サイト表示 {}件)",
            outcome.records.len(),
            outcome.site_reported_total
        );
        self.emit(CrawlEvent::Completed {
            total_records: outcome.records.len(),
            site_reported_total: outcome.site_reported_total,
        });
        Ok(outcome)
    }

    async fn fetch_records(&self, url: &str) -> Result<Vec<ListingRecord>, ScraperError> {
        let doc = self.pages.fetch(url).await?;
        let records = extract_records(&doc.root());
        debug!("{}件抽出: {}", records.len(), url);
        Ok(records)
    }

    /// 該当物件数を読むためだけに同じURLを取り直す
    async fn fetch_total_count(&self, url: &str) -> Result<u64, ScraperError> {
        let doc = self.pages.fetch(url).await?;
        let total = total_count(&doc.root());
        debug!("サイト表示の該当物件数: {}", total);
        Ok(total)
    }

    fn progress(&self, page: u32, max_pages: u32) -> CrawlProgress {
        let done = self.page_times.len().max(1) as u32;
        let mean = self.page_times.iter().sum::<Duration>() / done;
        let remaining = mean * max_pages.saturating_sub(page);

        CrawlProgress {
            page,
            max_pages,
            fraction: f64::from(page) / f64::from(max_pages.max(1)),
            records_so_far: self.records.len(),
            eta: Eta::from_duration(remaining),
        }
    }

    fn abort(&mut self, page: u32, e: ScraperError) -> ScraperError {
        error!("ページ {} の取得に失敗したためクロールを中断: {}", page, e);
        self.state = CrawlState::Aborted;
        e
    }

    fn finish(&mut self, pages_done: u32, cancelled: bool) -> CrawlOutcome {
        CrawlOutcome {
            records: std::mem::take(&mut self.records),
            site_reported_total: self.site_reported_total,
            pages_done,
            cancelled,
        }
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(events) = &self.events {
            // 受信側が閉じていてもクロールは続ける
            let _ = events.send(event);
        }
    }
}
