// ============================================
// src/register.rs
// 単語の登録・削除・色マーク変更
// ============================================

use tracing::debug;

use crate::model::{Color, ColorMark, Topic, WordPair, generate_id};
use crate::repository::TopicRepository;
use crate::store::KeyValueStore;

/// 1つのトピックの単語を編集して保存する
///
/// 渡されたトピックをそのまま書き戻す (保存前に読み直さない)。
pub struct Registrar<'r, S> {
    repo: &'r TopicRepository<S>,
}

impl<'r, S: KeyValueStore> Registrar<'r, S> {
    pub fn new(repo: &'r TopicRepository<S>) -> Self {
        Self { repo }
    }

    /// 単語を末尾に追加する。どちらかが空なら何もしない
    pub fn add_word(&self, mut topic: Topic, english: &str, japanese: &str) -> Topic {
        let (english, japanese) = (english.trim(), japanese.trim());
        if english.is_empty() || japanese.is_empty() {
            return topic;
        }

        let word = WordPair {
            id: generate_id(),
            english: english.to_string(),
            japanese: japanese.to_string(),
            color_mark: ColorMark::None,
        };
        debug!(topic = %topic.id, word = %word.id, "Adding word");
        topic.words.push(word);
        self.repo.upsert_topic(&topic);
        topic
    }

    pub fn remove_word(&self, mut topic: Topic, word_id: &str) -> Topic {
        let before = topic.words.len();
        topic.words.retain(|w| w.id != word_id);
        if topic.words.len() != before {
            self.repo.upsert_topic(&topic);
        }
        topic
    }

    /// 色マークを設定する (`ColorMark::None` で解除)
    pub fn set_color_mark(&self, mut topic: Topic, word_id: &str, mark: ColorMark) -> Topic {
        if let Some(word) = topic.words.iter_mut().find(|w| w.id == word_id) {
            word.color_mark = mark;
            self.repo.upsert_topic(&topic);
        }
        topic
    }

    /// 同じ色なら解除、違う色なら付け替え
    pub fn toggle_color(&self, topic: Topic, word_id: &str, color: Color) -> Topic {
        match topic.word(word_id).map(|w| w.color_mark.toggled(color)) {
            Some(mark) => self.set_color_mark(topic, word_id, mark),
            None => topic,
        }
    }
}
