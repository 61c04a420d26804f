//! 金額表記の正規化

use super::types::FieldValue;

/// 「万円」単位の表記
pub const MAN_YEN: &str = "万円";

/// "12.5万円" → 125000。「万円」を含まない値（"-" や "該当なし"、"5000円" など）はそのまま返す。
///
/// 数値として読めない「万円」表記も元の文字列のまま返す。
pub fn normalize_yen(text: &str) -> FieldValue {
    if !text.contains(MAN_YEN) {
        return FieldValue::Text(text.to_string());
    }

    let digits: String = text.replace(MAN_YEN, "").replace(' ', "");
    match digits.trim().parse::<f64>() {
        Ok(man) if man.is_finite() => FieldValue::Yen((man * 10_000.0).round() as i64),
        _ => FieldValue::Text(text.to_string()),
    }
}
