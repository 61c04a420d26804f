//! 文京区の町名と SUUMO の町域コード (oz)

/// 町名（コード順）
pub const BUNKYO_TOWNS: [&str; 19] = [
    "大塚", "音羽", "春日", "小石川", "後楽", "小日向", "水道", "関口", "千石", "千駄木", "西片",
    "根津", "白山", "本駒込", "本郷", "向丘", "目白台", "弥生", "湯島",
];

const BUNKYO_CODE_PREFIX: &str = "131050";

/// 町名に対応するコード（例: 大塚 → 13105001）
pub fn code_for(name: &str) -> Option<String> {
    BUNKYO_TOWNS
        .iter()
        .position(|town| *town == name)
        .map(|index| format!("{}{:02}", BUNKYO_CODE_PREFIX, index + 1))
}

/// 全町名とコードの組
pub fn all() -> impl Iterator<Item = (&'static str, String)> {
    BUNKYO_TOWNS
        .iter()
        .enumerate()
        .map(|(index, town)| (*town, format!("{}{:02}", BUNKYO_CODE_PREFIX, index + 1)))
}
