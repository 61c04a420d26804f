use async_trait::async_trait;

use crate::error::ScraperError;

/// URLから生のバイト列を取得する
///
/// 通信レベルの失敗（接続・タイムアウト）だけを `ScraperError::Transport` として返し、
/// HTTPステータスはエラーにしない。
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScraperError>;
}
