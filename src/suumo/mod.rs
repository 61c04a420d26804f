//! SUUMO 賃貸一覧モジュール
//!
//! 検索URLの生成、一覧ページからの部屋レコード抽出、金額の正規化を行う

mod extract;
mod normalize;
mod search_url;
pub mod towns;
mod types;

pub use extract::{
    extract_building, extract_records, extract_room, total_count, Building, Room,
    BUILDING_DETAIL_SLOTS,
};
pub use normalize::{normalize_yen, MAN_YEN};
pub use search_url::build_search_url;
pub use types::{FieldValue, ListingRecord, SearchFilter, COLUMNS, COLUMN_COUNT};
