//! SUUMO 関連の型定義

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

use super::towns;

/// 1レコードの列数
pub const COLUMN_COUNT: usize = 12;

/// 表示用の列名（レコードのフィールド順）
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "建物の種類",
    "物件名",
    "住所",
    "築年数",
    "階数",
    "階",
    "家賃",
    "管理費",
    "敷金",
    "礼金",
    "間取り",
    "面積",
];

/// 検索条件（1回のクロール中は不変）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// 町域コード (oz)。選択順を保持する
    pub town_codes: Vec<String>,
    /// 賃料下限（万円）
    pub min_price: f64,
    /// 賃料上限（万円）
    pub max_price: f64,
    /// 取得する最大ページ数
    pub max_pages: u32,
}

impl SearchFilter {
    pub fn new<I, S>(town_codes: I, min_price: f64, max_price: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut codes: Vec<String> = Vec::new();
        for code in town_codes {
            let code = code.into();
            if !codes.contains(&code) {
                codes.push(code);
            }
        }

        Self {
            town_codes: codes,
            min_price,
            max_price,
            max_pages: 10,
        }
    }

    /// 町名（例: "本郷"）から検索条件を作成
    pub fn from_town_names<I, S>(
        names: I,
        min_price: f64,
        max_price: f64,
    ) -> Result<Self, ScraperError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes = Vec::new();
        for name in names {
            let name = name.as_ref();
            let code = towns::code_for(name)
                .ok_or_else(|| ScraperError::InvalidFilter(format!("未知の町名: {}", name)))?;
            codes.push(code);
        }
        Ok(Self::new(codes, min_price, max_price))
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// 呼び出し側で行う入力チェック（URL生成自体は失敗しない）
    pub fn validate(&self) -> Result<(), ScraperError> {
        if self.town_codes.is_empty() {
            return Err(ScraperError::InvalidFilter("町名が選択されていません".into()));
        }
        if !(self.min_price.is_finite() && self.max_price.is_finite()) || self.min_price <= 0.0 {
            return Err(ScraperError::InvalidFilter(format!(
                "賃料の指定が不正です: {}〜{}",
                self.min_price, self.max_price
            )));
        }
        if self.min_price > self.max_price {
            return Err(ScraperError::InvalidFilter(format!(
                "賃料の下限が上限を超えています: {}〜{}",
                self.min_price, self.max_price
            )));
        }
        if self.max_pages == 0 {
            return Err(ScraperError::InvalidFilter(
                "最大ページ数は1以上を指定してください".into(),
            ));
        }
        Ok(())
    }
}

/// 正規化後のセル値（円に換算できたものは整数）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Yen(i64),
    Text(String),
}

impl FieldValue {
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Yen(v) => v.to_string(),
            FieldValue::Text(s) => s,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Yen(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// 部屋1件分のレコード（12列固定）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub building_type: String,
    pub name: String,
    pub address: String,
    pub age: String,
    pub floors: String,
    pub floor: String,
    pub rent: FieldValue,
    pub admin_fee: String,
    pub deposit: FieldValue,
    pub gratuity: FieldValue,
    pub layout: String,
    pub area: String,
}

impl ListingRecord {
    /// 位置順の値からレコードを組み立てる。
    ///
    /// 先頭12個だけを使い、足りない場合は `None`（その部屋は採用しない）。
    pub fn from_slots(slots: Vec<FieldValue>) -> Option<Self> {
        if slots.len() < COLUMN_COUNT {
            return None;
        }

        let fixed: Vec<FieldValue> = slots.into_iter().take(COLUMN_COUNT).collect();
        let [
            building_type,
            name,
            address,
            age,
            floors,
            floor,
            rent,
            admin_fee,
            deposit,
            gratuity,
            layout,
            area,
        ]: [FieldValue; COLUMN_COUNT] = fixed.try_into().ok()?;

        Some(Self {
            building_type: building_type.into_text(),
            name: name.into_text(),
            address: address.into_text(),
            age: age.into_text(),
            floors: floors.into_text(),
            floor: floor.into_text(),
            rent,
            admin_fee: admin_fee.into_text(),
            deposit,
            gratuity,
            layout: layout.into_text(),
            area: area.into_text(),
        })
    }

    /// 表示用に列順の文字列へ変換
    pub fn to_row(&self) -> [String; COLUMN_COUNT] {
        [
            self.building_type.clone(),
            self.name.clone(),
            self.address.clone(),
            self.age.clone(),
            self.floors.clone(),
            self.floor.clone(),
            self.rent.to_string(),
            self.admin_fee.clone(),
            self.deposit.to_string(),
            self.gratuity.to_string(),
            self.layout.clone(),
            self.area.clone(),
        ]
    }
}
