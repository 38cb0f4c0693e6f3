// ============================================
// src/save_data.rs
// セーブデータ (トピック一覧) の読み書き
// ============================================

use tracing::{debug, error, warn};

use crate::model::Topic;
use crate::store::KeyValueStore;

/// トピック一覧を保存するキー
pub const STORAGE_KEY: &str = "sokutango_topics";

/// トピック一覧を1つの JSON としてストアに読み書きする
///
/// 読み込み失敗は空の一覧、書き込み失敗はログに出すだけで呼び出し側には返さない。
#[derive(Debug)]
pub struct TopicStorage<S> {
    store: S,
}

impl<S: KeyValueStore> TopicStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// MARK:保存されている全トピックを読み込む
    pub fn read_all(&self) -> Vec<Topic> {
        let raw = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read topics: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Topic>>(&raw) {
            Ok(topics) => {
                debug!(count = topics.len(), "Loaded topics");
                topics
            }
            Err(e) => {
                warn!("Stored topics are malformed, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    /// MARK:全トピックを丸ごと上書き保存する
    pub fn write_all(&self, topics: &[Topic]) {
        let json = match serde_json::to_string(topics) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize topics: {e}");
                return;
            }
        };

        if let Err(e) = self.store.set(STORAGE_KEY, &json) {
            error!("Failed to save topics: {e}");
        } else {
            debug!(count = topics.len(), "Saved topics");
        }
    }
}
