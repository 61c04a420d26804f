//! SUUMO 賃貸スクレイパーライブラリ
//!
//! - 文京区の町名・賃料条件から一覧ページを順に取得
//! - 建物ごと・部屋ごとの情報を12列のレコードに抽出
//! - 別名で再掲載された重複物件を集計
//!
//! # 使用例
//!
//! ```rust,ignore
//! use suumo_scraper::{CrawlConfig, CrawlService, SearchFilter};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = CrawlService::new(CrawlConfig::default()).unwrap();
//!
//!     let filter = SearchFilter::from_town_names(["本郷", "弥生"], 7.0, 15.0)
//!         .unwrap()
//!         .with_max_pages(5);
//!
//!     let report = service.call(filter).await.unwrap();
//!     println!("{}", report);
//! }
//! ```

pub mod config;
pub mod crawl;
pub mod dedup;
pub mod document;
pub mod error;
pub mod fetch;
pub mod retry;
pub mod service;
pub mod suumo;
pub mod traits;

#[cfg(test)]
mod test_support;

// 主要な型をリエクスポート
pub use config::CrawlConfig;
pub use crawl::{CrawlEvent, CrawlOrchestrator, CrawlOutcome, CrawlProgress, CrawlState, Eta};
pub use dedup::{analyze, DuplicateKey, DuplicateSummary};
pub use document::{Document, Node};
pub use error::ScraperError;
pub use fetch::{HttpFetcher, PageFetcher};
pub use retry::RetryPolicy;
pub use service::{CrawlReport, CrawlService};
pub use suumo::{FieldValue, ListingRecord, SearchFilter};
pub use traits::Fetcher;
