// ============================================
// src/repository.rs
// トピックの取得・追加・更新・削除
// ============================================

use tracing::info;

use crate::model::{Topic, TopicSummary};
use crate::save_data::TopicStorage;
use crate::store::KeyValueStore;

/// トピック一覧に対する CRUD
///
/// 毎回ストアから読み直してから変更し、一覧全体を書き戻す。
/// キャッシュは持たないので、別プロセスの書き込みは次の読み込みで見える (後勝ち)。
#[derive(Debug)]
pub struct TopicRepository<S> {
    storage: TopicStorage<S>,
}

impl<S: KeyValueStore> TopicRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            storage: TopicStorage::new(store),
        }
    }

    pub fn list_topics(&self) -> Vec<Topic> {
        self.storage.read_all()
    }

    pub fn summaries(&self) -> Vec<TopicSummary> {
        self.list_topics().iter().map(Topic::summary).collect()
    }

    pub fn get_topic(&self, id: &str) -> Option<Topic> {
        self.storage.read_all().into_iter().find(|t| t.id == id)
    }

    /// 同じ ID があれば置き換え、なければ末尾に追加する
    pub fn upsert_topic(&self, topic: &Topic) {
        let mut topics = self.storage.read_all();
        match topics.iter_mut().find(|t| t.id == topic.id) {
            Some(existing) => *existing = topic.clone(),
            None => topics.push(topic.clone()),
        }
        self.storage.write_all(&topics);
    }

    /// 存在しない ID なら何も消さない (エラーにはしない)
    pub fn delete_topic(&self, id: &str) {
        let mut topics = self.storage.read_all();
        topics.retain(|t| t.id != id);
        self.storage.write_all(&topics);
        info!(id, "Deleted topic");
    }

    /// 名前を trim して新しいトピックを作る。空の名前なら何もしない
    pub fn create_topic(&self, name: &str) -> Option<Topic> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let topic = Topic::new(name);
        self.upsert_topic(&topic);
        info!(id = %topic.id, name, "Created topic");
        Some(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn create_and_list() {
        let repo = TopicRepository::new(MemoryStore::new());
        let topic = repo.create_topic("  Animals ").unwrap();
        assert_eq!(topic.name, "Animals");
        assert!(topic.words.is_empty());

        let topics = repo.list_topics();
        assert_eq!(topics, vec![topic.clone()]);
        assert_eq!(repo.get_topic(&topic.id), Some(topic));
    }

    #[test]
    fn blank_name_creates_nothing() {
        let store = MemoryStore::new();
        let repo = TopicRepository::new(&store);
        assert!(repo.create_topic("   ").is_none());
        assert!(repo.list_topics().is_empty());
        // 書き込み自体が発生しない
        assert!(store.get(crate::save_data::STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn upsert_replaces_in_place() {
        let repo = TopicRepository::new(MemoryStore::new());
        let a = repo.create_topic("A").unwrap();
        let b = repo.create_topic("B").unwrap();

        let mut renamed = a.clone();
        renamed.name = "A2".into();
        repo.upsert_topic(&renamed);

        let topics = repo.list_topics();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].name, "A2");
        assert_eq!(topics[1].id, b.id);
    }

    #[test]
    fn delete_is_idempotent() {
        let repo = TopicRepository::new(MemoryStore::new());
        let a = repo.create_topic("A").unwrap();
        let b = repo.create_topic("B").unwrap();

        repo.delete_topic(&a.id);
        let once = repo.list_topics();
        repo.delete_topic(&a.id);
        assert_eq!(repo.list_topics(), once);
        assert_eq!(once, vec![b]);
    }

    #[test]
    fn delete_missing_leaves_collection_unchanged() {
        let repo = TopicRepository::new(MemoryStore::new());
        repo.create_topic("A").unwrap();
        let before = repo.list_topics();
        repo.delete_topic("missing-id");
        assert_eq!(repo.list_topics(), before);
    }

    #[test]
    fn missing_topic_is_none() {
        let repo = TopicRepository::new(MemoryStore::new());
        assert!(repo.get_topic("nope").is_none());
    }

    #[test]
    fn summaries_count_words() {
        let repo = TopicRepository::new(MemoryStore::new());
        let mut topic = repo.create_topic("A").unwrap();
        topic.words.push(crate::model::WordPair {
            id: "w".into(),
            english: "cat".into(),
            japanese: "猫".into(),
            color_mark: Default::default(),
        });
        repo.upsert_topic(&topic);
        let summaries = repo.summaries();
        assert_eq!(summaries[0].word_count, 1);
        assert_eq!(summaries[0].name, "A");
    }
}
