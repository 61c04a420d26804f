//! パース済みHTMLへの最小限の問い合わせインターフェース
//!
//! 抽出ロジックは [`Node`] だけに依存し、具体的なパーサー型には依存しない。

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// CSSセレクタで辿れるノード
pub trait Node: Sized {
    /// 子孫からセレクタに一致するノードを文書順で全て返す（無ければ空）
    fn find_all(&self, selector: &str) -> Vec<Self>;

    /// 最初に一致する子孫ノード
    fn find(&self, selector: &str) -> Option<Self> {
        self.find_all(selector).into_iter().next()
    }

    /// 子孫テキストを連結したもの
    fn inner_text(&self) -> String;
}

/// パース済みのページ
pub struct Document {
    html: Html,
}

impl Document {
    /// 取得したバイト列をパースする（壊れたHTMLでも失敗しない）
    pub fn parse(bytes: &[u8]) -> Self {
        let source = String::from_utf8_lossy(bytes);
        Self {
            html: Html::parse_document(&source),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}

impl<'a> Node for ElementRef<'a> {
    fn find_all(&self, selector: &str) -> Vec<Self> {
        match Selector::parse(selector) {
            Ok(sel) => self.select(&sel).collect(),
            Err(e) => {
                warn!("不正なセレクタ {}: {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn inner_text(&self) -> String {
        self.text().collect()
    }
}
