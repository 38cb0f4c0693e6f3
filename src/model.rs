// ============================================
// src/model.rs
// トピックと単語のデータ構造
// ============================================

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

/// 色マーク (フィルターやトグルで使う3色)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Yellow,
    Green,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Yellow, Color::Green];

    /// 表示用のラベル
    pub fn label(self) -> &'static str {
        match self {
            Color::Red => "赤",
            Color::Yellow => "黄",
            Color::Green => "緑",
        }
    }
}

/// 単語の習熟度マーク (3色 + なし)
///
/// 保存形式は `"red" | "yellow" | "green" | null`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Color>", into = "Option<Color>")]
pub enum ColorMark {
    Red,
    Yellow,
    Green,
    #[default]
    None,
}

impl ColorMark {
    /// マークが付いていれば、その色を返す
    pub fn color(self) -> Option<Color> {
        self.into()
    }

    pub fn is(self, color: Color) -> bool {
        self.color() == Some(color)
    }

    /// 同じ色なら外し、違う色なら付け替える
    pub fn toggled(self, color: Color) -> ColorMark {
        if self.is(color) {
            ColorMark::None
        } else {
            color.into()
        }
    }
}

impl From<Color> for ColorMark {
    fn from(color: Color) -> Self {
        match color {
            Color::Red => ColorMark::Red,
            Color::Yellow => ColorMark::Yellow,
            Color::Green => ColorMark::Green,
        }
    }
}

impl From<Option<Color>> for ColorMark {
    fn from(color: Option<Color>) -> Self {
        color.map_or(ColorMark::None, ColorMark::from)
    }
}

impl From<ColorMark> for Option<Color> {
    fn from(mark: ColorMark) -> Self {
        match mark {
            ColorMark::Red => Some(Color::Red),
            ColorMark::Yellow => Some(Color::Yellow),
            ColorMark::Green => Some(Color::Green),
            ColorMark::None => None,
        }
    }
}

/// 1つの単語 (英語と日本語のペア)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPair {
    pub id: String,
    pub english: String,
    pub japanese: String,
    #[serde(default)]
    pub color_mark: ColorMark,
}

/// 単語帳 (名前付きの単語リスト)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    /// 登録順 = 表示順 = クイズの出題順
    pub words: Vec<WordPair>,
    /// 作成日時 (エポックミリ秒)
    pub created_at: i64,
}

impl Topic {
    /// 新しい ID と現在時刻で空のトピックを作る
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            words: Vec::new(),
            created_at: Utc::now().timestamp_millis(),
        }
    }

    pub fn word(&self, word_id: &str) -> Option<&WordPair> {
        self.words.iter().find(|w| w.id == word_id)
    }

    pub fn summary(&self) -> TopicSummary {
        TopicSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            word_count: self.words.len(),
        }
    }
}

/// 一覧表示用の要約
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSummary {
    pub id: String,
    pub name: String,
    pub word_count: usize,
}

// MARK: ID生成

const ID_SUFFIX_LEN: usize = 9;

/// 実用上ユニークな ID を生成する
///
/// 36進数のミリ秒タイムスタンプ + ランダムな英数字。衝突の検出はしない。
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}{}", to_base36(millis), suffix)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}
