//! 重複物件の検出
//!
//! 建物の種類と物件名を除く10列が完全に一致するレコードを同じ部屋とみなす。
//! 別名で再掲載された同一物件を見つけるため。

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::suumo::{FieldValue, ListingRecord};

/// 重複判定に使う10列の射影
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey<'a> {
    pub address: &'a str,
    pub age: &'a str,
    pub floors: &'a str,
    pub floor: &'a str,
    pub rent: &'a FieldValue,
    pub admin_fee: &'a str,
    pub deposit: &'a FieldValue,
    pub gratuity: &'a FieldValue,
    pub layout: &'a str,
    pub area: &'a str,
}

impl<'a> From<&'a ListingRecord> for DuplicateKey<'a> {
    fn from(r: &'a ListingRecord) -> Self {
        Self {
            address: &r.address,
            age: &r.age,
            floors: &r.floors,
            floor: &r.floor,
            rent: &r.rent,
            admin_fee: &r.admin_fee,
            deposit: &r.deposit,
            gratuity: &r.gratuity,
            layout: &r.layout,
            area: &r.area,
        }
    }
}

/// 重複集計の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateSummary {
    /// 重複を除いた件数
    pub unique_count: usize,
    /// 他のレコードとキーが一致したレコードの件数（最初の出現も含む）
    pub duplicate_count: usize,
    /// 入力と同じ順で、重複グループに属するなら true
    pub duplicate_mask: Vec<bool>,
    /// 最初の出現順を保った重複除去後のレコード
    pub deduplicated: Vec<ListingRecord>,
}

pub fn analyze(records: &[ListingRecord]) -> DuplicateSummary {
    let mut counts: HashMap<DuplicateKey<'_>, usize> = HashMap::with_capacity(records.len());
    for record in records {
        *counts.entry(DuplicateKey::from(record)).or_insert(0) += 1;
    }

    let duplicate_mask: Vec<bool> = records
        .iter()
        .map(|r| counts.get(&DuplicateKey::from(r)).copied().unwrap_or(0) > 1)
        .collect();

    let mut seen = HashSet::with_capacity(counts.len());
    let deduplicated: Vec<ListingRecord> = records
        .iter()
        .filter(|r| seen.insert(DuplicateKey::from(*r)))
        .cloned()
        .collect();

    DuplicateSummary {
        unique_count: deduplicated.len(),
        duplicate_count: duplicate_mask.iter().filter(|d| **d).count(),
        duplicate_mask,
        deduplicated,
    }
}
