//! 指数バックオフ付きリトライ

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::error::ScraperError;

/// リトライ設定（試行回数・初回待機・倍率）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 総試行回数（初回を含む）
    pub max_attempts: u32,
    /// 最初のリトライ前の待機時間
    pub initial_delay: Duration,
    /// 失敗ごとの待機時間の倍率
    pub backoff_factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(10),
            backoff_factor: 2,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, backoff_factor: u32) -> Self {
        Self {
            max_attempts,
            initial_delay,
            backoff_factor,
        }
    }

    /// リトライなし（1回だけ試行）
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, 1)
    }

    /// `attempt` 回目（1始まり）の失敗後に待つ時間
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        self.initial_delay * self.backoff_factor.saturating_pow(exponent)
    }

    /// `op` を実行し、リトライ可能なエラーなら待機して再試行する。
    ///
    /// 試行回数を使い切った場合は最後のエラーをそのまま返す。
    pub async fn retry<T, F, Fut>(&self, mut op: F) -> Result<T, ScraperError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ScraperError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let backoff = self.delay_after(attempt);
                    warn!(
                        "試行 {}/{} 失敗、{:?} 後にリトライ: {}",
                        attempt, max_attempts, backoff, e
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
