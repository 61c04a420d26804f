use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("通信エラー: {0}")]
    Transport(String),

    #[error("HTTPクライアント初期化エラー: {0}")]
    ClientInit(String),

    #[error("検索条件が不正です: {0}")]
    InvalidFilter(String),

    #[error("設定が不正です: {0}")]
    InvalidConfig(String),
}

impl ScraperError {
    /// リトライ対象のエラーか（通信レベルの失敗のみ）
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScraperError::Transport(_))
    }
}

impl From<reqwest::Error> for ScraperError {
    fn from(e: reqwest::Error) -> Self {
        ScraperError::Transport(e.to_string())
    }
}
