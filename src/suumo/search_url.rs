//! 検索URLの生成

use url::Url;

use super::types::SearchFilter;

/// 賃料より前に付く固定パラメータ（文京区・賃貸・並び順など）
const LEADING_PARAMS: [(&str, &str); 12] = [
    ("ar", "030"),
    ("bs", "040"),
    ("pc", "30"),
    ("smk", ""),
    ("po1", "25"),
    ("po2", "99"),
    ("shkr1", "03"),
    ("shkr2", "03"),
    ("shkr3", "03"),
    ("shkr4", "03"),
    ("sc", "13105"),
    ("ta", "13"),
];

const TRAILING_PARAMS: [(&str, &str); 7] = [
    ("et", "9999999"),
    ("mb", "0"),
    ("mt", "9999999"),
    ("cn", "9999999"),
    ("fw2", ""),
    ("ts", "1"),
    ("ts", "2"),
];

/// 町域コードごとに繰り返すパラメータ名
const TOWN_PARAM: &str = "oz";

/// 検索条件とページ番号から一覧ページのURLを生成する。
///
/// ベースURLは解釈済みのものを受け取る（[`CrawlConfig::parse_base_url`]）。
/// 検索条件の検証はしない。町域コードが空でもURLとしては正しいものを返す。
///
/// [`CrawlConfig::parse_base_url`]: crate::config::CrawlConfig::parse_base_url
pub fn build_search_url(base_url: &Url, filter: &SearchFilter, page: u32) -> String {
    let min_price = filter.min_price.to_string();
    let max_price = filter.max_price.to_string();
    let page = page.to_string();

    let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(32);
    pairs.extend(LEADING_PARAMS);
    pairs.push(("cb", min_price.as_str()));
    pairs.push(("ct", max_price.as_str()));
    pairs.extend(TRAILING_PARAMS);
    pairs.push(("page", page.as_str()));
    for code in &filter.town_codes {
        pairs.push((TOWN_PARAM, code.as_str()));
    }

    let mut url = base_url.clone();
    url.query_pairs_mut().extend_pairs(&pairs);
    url.into()
}
