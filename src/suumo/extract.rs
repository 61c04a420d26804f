//! 一覧ページから部屋ごとのレコードを抽出する
//!
//! SUUMO の一覧は「建物ブロック (`cassetteitem`)」の中に「部屋行 (`js-cassette_link`)」が並ぶ構造。
//! 部屋行のセルは位置で意味が決まるため、マークアップが変わると黙って値がずれる。

use tracing::{debug, warn};

use crate::document::Node;

use super::normalize::normalize_yen;
use super::types::{FieldValue, ListingRecord};

const LISTING_GROUP: &str = ".cassetteitem";
const BUILDING_TYPE: &str = ".ui-pct.ui-pct--util1";
const BUILDING_NAME: &str = ".cassetteitem_content-title";
const BUILDING_ADDRESS: &str = ".cassetteitem_detail-col1";
const BUILDING_DETAILS: &str = ".cassetteitem_detail-col3";
const BUILDING_DETAIL_ITEM: &str = "div";

const ROOM_TABLE: &str = ".cassetteitem_other";
const ROOM_ROW: &str = ".js-cassette_link";
const ROOM_CELL: &str = "td";

const RENT: &str = ".cassetteitem_other-emphasis.ui-text--bold";
const ADMIN_FEE: &str = ".cassetteitem_price.cassetteitem_price--administration";
const DEPOSIT: &str = ".cassetteitem_price.cassetteitem_price--deposit";
const GRATUITY: &str = ".cassetteitem_price.cassetteitem_price--gratuity";
const LAYOUT: &str = ".cassetteitem_madori";
const AREA: &str = ".cassetteitem_menseki";

const HIT_COUNT: &str = "div.paginate_set-hit";

/// 建物詳細（築年数・階数）の列数。過不足があっても列がずれないよう固定する
pub const BUILDING_DETAIL_SLOTS: usize = 2;

/// 建物単位の情報
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub building_type: String,
    pub name: String,
    pub address: String,
    pub details: Vec<String>,
}

/// 部屋行のセルから読み取った値
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// セル2: 階
    pub floor: String,
    /// セル3: 賃料と管理費
    pub rent: FieldValue,
    pub admin_fee: String,
    /// セル4: 敷金と礼金
    pub deposit: FieldValue,
    pub gratuity: FieldValue,
    /// セル5: 間取りと面積
    pub layout: String,
    pub area: String,
    /// セル6: 自由記述（12列に収まらないため表には出ない）
    pub remarks: Option<String>,
}

/// ページ内の全部屋をレコードにする（文書順）
///
/// 建物の必須項目が無ければその建物を、部屋行のセルが欠けていればその部屋だけを読み飛ばす。
pub fn extract_records<N: Node>(root: &N) -> Vec<ListingRecord> {
    let groups = root.find_all(LISTING_GROUP);
    let mut records = Vec::new();

    for group in &groups {
        let Some(building) = extract_building(group) else {
            debug!("建物情報が欠けているためスキップ");
            continue;
        };

        let rows = group
            .find(ROOM_TABLE)
            .map(|table| table.find_all(ROOM_ROW))
            .unwrap_or_default();

        for (index, row) in rows.iter().enumerate() {
            match extract_room(row).and_then(|room| assemble(&building, room)) {
                Some(record) => records.push(record),
                None => warn!("{} の部屋{}を抽出できないためスキップ", building.name, index + 1),
            }
        }
    }

    debug!("{}棟から{}件の部屋を抽出", groups.len(), records.len());
    records
}

/// 建物ブロックから種別・名称・住所・詳細を読む
pub fn extract_building<N: Node>(group: &N) -> Option<Building> {
    let details: Vec<String> = group
        .find(BUILDING_DETAILS)
        .map(|col| {
            col.find_all(BUILDING_DETAIL_ITEM)
                .iter()
                .map(|d| d.inner_text())
                .collect()
        })
        .unwrap_or_default();

    Some(Building {
        building_type: group.find(BUILDING_TYPE)?.inner_text(),
        name: group.find(BUILDING_NAME)?.inner_text(),
        address: group.find(BUILDING_ADDRESS)?.inner_text(),
        details,
    })
}

/// 部屋行のセルを位置で読む。必要な要素が1つでも無ければ `None`
pub fn extract_room<N: Node>(row: &N) -> Option<Room> {
    let cells = row.find_all(ROOM_CELL);

    let floor = cells.get(2)?.inner_text().trim().to_string();

    let price = cells.get(3)?;
    let rent = normalize_yen(&price.find(RENT)?.inner_text());
    let admin_fee = price.find(ADMIN_FEE)?.inner_text();

    let initial = cells.get(4)?;
    let deposit = normalize_yen(&initial.find(DEPOSIT)?.inner_text());
    let gratuity = normalize_yen(&initial.find(GRATUITY)?.inner_text());

    let plan = cells.get(5)?;
    let layout = plan.find(LAYOUT)?.inner_text();
    let area = plan.find(AREA)?.inner_text();

    let remarks = cells.get(6).map(|cell| cell.inner_text().trim().to_string());

    Some(Room {
        floor,
        rent,
        admin_fee,
        deposit,
        gratuity,
        layout,
        area,
        remarks,
    })
}

/// 建物と部屋の値を並べて12列に切り詰める
fn assemble(building: &Building, room: Room) -> Option<ListingRecord> {
    let mut slots = vec![
        FieldValue::from(building.building_type.as_str()),
        FieldValue::from(building.name.as_str()),
        FieldValue::from(building.address.as_str()),
    ];
    for i in 0..BUILDING_DETAIL_SLOTS {
        let detail = building.details.get(i).cloned().unwrap_or_default();
        slots.push(FieldValue::from(detail));
    }
    slots.push(FieldValue::from(room.floor));
    slots.push(room.rent);
    slots.push(FieldValue::from(room.admin_fee));
    slots.push(room.deposit);
    slots.push(room.gratuity);
    slots.push(FieldValue::from(room.layout));
    slots.push(FieldValue::from(room.area));
    if let Some(remarks) = room.remarks {
        slots.push(FieldValue::from(remarks));
    }

    ListingRecord::from_slots(slots)
}

/// サイトが表示している該当物件数（「1,234件」「１,２３４件」→ 1234）。見つからなければ 0
pub fn total_count<N: Node>(root: &N) -> u64 {
    let Some(node) = root.find(HIT_COUNT) else {
        return 0;
    };
    let text = node.inner_text();
    let head = text.split('件').next().unwrap_or_default();
    let digits: String = head.chars().filter_map(half_width_digit).collect();
    digits.parse().unwrap_or(0)
}

/// 全角数字は半角に寄せる
fn half_width_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        '０'..='９' => char::from_digit(c as u32 - '０' as u32, 10),
        _ => None,
    }
}
