//! テスト用のHTMLフィクスチャと取得のフェイク

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::ScraperError;
use crate::traits::Fetcher;

pub struct Room<'a> {
    pub floor: &'a str,
    pub rent: &'a str,
    pub admin_fee: &'a str,
    pub deposit: &'a str,
    pub gratuity: &'a str,
    pub layout: &'a str,
    pub area: &'a str,
}

impl<'a> Room<'a> {
    pub fn new(floor: &'a str, rent: &'a str) -> Self {
        Self {
            floor,
            rent,
            admin_fee: "5000円",
            deposit: "10万円",
            gratuity: "-",
            layout: "1K",
            area: "25.5m2",
        }
    }
}

fn cells(room: &Room<'_>) -> Vec<String> {
    vec![
        r#"<td class="cassetteitem_other-checkbox"><input type="checkbox"></td>"#.to_string(),
        r#"<td><div class="casssetteitem_other-thumbnail"></div></td>"#.to_string(),
        format!("<td>\n  {}\n</td>", room.floor),
        format!(
            r#"<td><ul><li><span class="cassetteitem_price cassetteitem_price--rent"><span class="cassetteitem_other-emphasis ui-text--bold">{}</span></span></li><li><span class="cassetteitem_price cassetteitem_price--administration">{}</span></li></ul></td>"#,
            room.rent, room.admin_fee
        ),
        format!(
            r#"<td><ul><li><span class="cassetteitem_price cassetteitem_price--deposit">{}</span></li><li><span class="cassetteitem_price cassetteitem_price--gratuity">{}</span></li></ul></td>"#,
            room.deposit, room.gratuity
        ),
        format!(
            r#"<td><ul><li><span class="cassetteitem_madori">{}</span></li><li><span class="cassetteitem_menseki">{}</span></li></ul></td>"#,
            room.layout, room.area
        ),
        "<td>\n  お気に入り\n</td>".to_string(),
        r#"<td><a class="js-cassette_link_href" href="/chintai/jnc_000000/">詳細を見る</a></td>"#
            .to_string(),
    ]
}

/// 部屋1行分
pub fn room_row(room: &Room<'_>) -> String {
    format!(
        r#"<tr class="js-cassette_link">{}</tr>"#,
        cells(room).join("")
    )
}

/// 敷金・礼金のセル（4列目）が欠けた部屋行
pub fn room_row_without_deposit_cell(room: &Room<'_>) -> String {
    let mut cells = cells(room);
    cells.remove(4);
    format!(r#"<tr class="js-cassette_link">{}</tr>"#, cells.join(""))
}

/// 建物1件分
pub fn building(name: &str, address: &str, details: &[&str], rows: &[String]) -> String {
    let details: String = details
        .iter()
        .map(|d| format!("<div>{}</div>", d))
        .collect();
    format!(
        r#"<div class="cassetteitem">
<div class="cassetteitem-detail">
<div class="cassetteitem_object-item"><span class="ui-pct ui-pct--util1">賃貸マンション</span></div>
<div class="cassetteitem_content-title">{name}</div>
<ul class="cassetteitem_detail">
<li class="cassetteitem_detail-col1">{address}</li>
<li class="cassetteitem_detail-col2"><div>東京メトロ丸ノ内線/本郷三丁目駅 歩5分</div></li>
<li class="cassetteitem_detail-col3">{details}</li>
</ul>
</div>
<div class="cassetteitem-item">
<table class="cassetteitem_other"><thead><tr><th>階</th></tr></thead><tbody>{rows}</tbody></table>
</div>
</div>"#,
        name = name,
        address = address,
        details = details,
        rows = rows.join("")
    )
}

/// 一覧ページ全体
pub fn page(buildings: &[String], hit_count: Option<&str>) -> String {
    let hit = hit_count
        .map(|count| format!(r#"<div class="paginate_set-hit">{}</div>"#, count))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html><html><head><title>SUUMO</title></head><body>{}<div id="js-bukkenList">{}</div></body></html>"#,
        hit,
        buildings.join("\n")
    )
}

/// 2棟 × {1, 3} 部屋のページ
pub fn two_building_page() -> String {
    let first = building(
        "グランドメゾン本郷",
        "東京都文京区本郷３",
        &["築10年", "5階建"],
        &[room_row(&Room::new("3階", "12.5万円"))],
    );
    let second = building(
        "コート小石川",
        "東京都文京区小石川２",
        &["築25年", "8階建"],
        &[
            room_row(&Room::new("1階", "8万円")),
            room_row(&Room::new("2階", "8.2万円")),
            room_row(&Room::new("5階", "9.5万円")),
        ],
    );
    page(&[first, second], Some("1,234件"))
}

/// URLごとではなく呼び出し順に応答を返す取得のフェイク
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<Vec<u8>, ScraperError>>>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedFetcher {
    pub fn new(responses: Vec<Result<Vec<u8>, ScraperError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn html(body: &str) -> Result<Vec<u8>, ScraperError> {
        Ok(body.as_bytes().to_vec())
    }

    pub fn transport_error() -> Result<Vec<u8>, ScraperError> {
        Err(ScraperError::Transport("connection reset".into()))
    }

    /// 呼び出されたURLと時刻
    pub fn calls(&self) -> Vec<(String, Instant)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScraperError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ScraperError::Transport("no scripted response".into())))
    }
}
