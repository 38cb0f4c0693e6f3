// ============================================
// src/quiz.rs
// 1問1答クイズの状態遷移
// ============================================

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::error::QuizError;
use crate::model::{Color, Topic, WordPair};
use crate::register::Registrar;
use crate::store::KeyValueStore;

/// 出題の向き
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// 日本語を見て英語で答える
    #[default]
    JapaneseToEnglish,
    /// 英語を見て日本語で答える
    EnglishToJapanese,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::JapaneseToEnglish => Direction::EnglishToJapanese,
            Direction::EnglishToJapanese => Direction::JapaneseToEnglish,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::JapaneseToEnglish => "日本語 → 英語",
            Direction::EnglishToJapanese => "英語 → 日本語",
        }
    }

    fn prompt(self, word: &WordPair) -> &str {
        match self {
            Direction::JapaneseToEnglish => &word.japanese,
            Direction::EnglishToJapanese => &word.english,
        }
    }

    fn answer(self, word: &WordPair) -> &str {
        match self {
            Direction::JapaneseToEnglish => &word.english,
            Direction::EnglishToJapanese => &word.japanese,
        }
    }
}

/// 色による絞り込み。空なら全単語が対象
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorFilter(BTreeSet<Color>);

impl ColorFilter {
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        Self(colors.into_iter().collect())
    }

    pub fn contains(&self, color: Color) -> bool {
        self.0.contains(&color)
    }

    pub fn toggle(&mut self, color: Color) {
        if !self.0.remove(&color) {
            self.0.insert(color);
        }
    }

    /// マークなしの単語はフィルターが空のときだけ対象になる
    pub fn accepts(&self, word: &WordPair) -> bool {
        if self.0.is_empty() {
            return true;
        }
        word.color_mark.color().is_some_and(|c| self.0.contains(&c))
    }

    /// 元の順序を保ったまま対象の単語だけを取り出す
    pub fn apply(&self, words: &[WordPair]) -> Vec<WordPair> {
        words.iter().filter(|w| self.accepts(w)).cloned().collect()
    }
}

/// 正解数と回答数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Score {
    /// 正答率 (四捨五入)。回答数 0 のときは 0
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (200 * self.correct + self.total) / (2 * self.total)
    }

    fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }
}

/// クイズの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    /// 出題できる単語がない
    NoEligibleWords,
    Answering { index: usize },
    ShowingResult { index: usize, was_correct: bool },
    Finished,
}

impl QuizState {
    fn start(len: usize) -> Self {
        if len == 0 {
            QuizState::NoEligibleWords
        } else {
            QuizState::Answering { index: 0 }
        }
    }

    fn after_answer(index: usize, was_correct: bool) -> Self {
        QuizState::ShowingResult { index, was_correct }
    }

    fn after_advance(index: usize, len: usize) -> Self {
        if index + 1 >= len {
            QuizState::Finished
        } else {
            QuizState::Answering { index: index + 1 }
        }
    }

    pub fn phase(&self) -> QuizPhase {
        match self {
            QuizState::NoEligibleWords => QuizPhase::NoEligibleWords,
            QuizState::Answering { .. } => QuizPhase::Answering,
            QuizState::ShowingResult { .. } => QuizPhase::ShowingResult,
            QuizState::Finished => QuizPhase::Finished,
        }
    }

    fn index(&self) -> Option<usize> {
        match *self {
            QuizState::Answering { index } | QuizState::ShowingResult { index, .. } => Some(index),
            _ => None,
        }
    }
}

/// 状態の種類 (エラー表示用)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    NoEligibleWords,
    Answering,
    ShowingResult,
    Finished,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuizPhase::NoEligibleWords => "no eligible words",
            QuizPhase::Answering => "answering",
            QuizPhase::ShowingResult => "showing a result",
            QuizPhase::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// 出題できる単語がない理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// トピックに単語が登録されていない
    NoWords,
    /// フィルターに合う単語がない
    FilteredOut,
}

/// 1回分のクイズ
#[derive(Debug, Clone)]
pub struct QuizSession {
    direction: Direction,
    filter: ColorFilter,
    /// 開始 (リセット) 時点で絞り込んだ出題リスト
    sequence: Vec<WordPair>,
    topic_has_words: bool,
    state: QuizState,
    score: Score,
}

impl QuizSession {
    pub fn new(topic: &Topic, direction: Direction, filter: ColorFilter) -> Self {
        let sequence = filter.apply(&topic.words);
        let state = QuizState::start(sequence.len());
        Self {
            direction,
            filter,
            sequence,
            topic_has_words: !topic.words.is_empty(),
            state,
            score: Score::default(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn filter(&self) -> &ColorFilter {
        &self.filter
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn sequence(&self) -> &[WordPair] {
        &self.sequence
    }

    /// (何問目, 全問数)。回答中・結果表示中のみ
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.state.index().map(|i| (i + 1, self.sequence.len()))
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self.state {
            QuizState::NoEligibleWords if self.topic_has_words => Some(EmptyReason::FilteredOut),
            QuizState::NoEligibleWords => Some(EmptyReason::NoWords),
            _ => None,
        }
    }

    pub fn current_word(&self) -> Option<&WordPair> {
        self.state.index().and_then(|i| self.sequence.get(i))
    }

    /// 問題として表示する文字列
    pub fn prompt(&self) -> Option<&str> {
        self.current_word().map(|w| self.direction.prompt(w))
    }

    /// 正解の文字列 (表示用、正規化前)
    pub fn expected_answer(&self) -> Option<&str> {
        self.current_word().map(|w| self.direction.answer(w))
    }

    /// 出題の向きを変えて最初からやり直す
    pub fn set_direction(&mut self, topic: &Topic, direction: Direction) {
        self.direction = direction;
        self.reset(topic);
    }

    /// フィルターを変えて最初からやり直す
    pub fn set_filter(&mut self, topic: &Topic, filter: ColorFilter) {
        self.filter = filter;
        self.reset(topic);
    }

    pub fn toggle_filter(&mut self, topic: &Topic, color: Color) {
        let mut filter = self.filter.clone();
        filter.toggle(color);
        self.set_filter(topic, filter);
    }

    fn reset(&mut self, topic: &Topic) {
        *self = Self::new(topic, self.direction, std::mem::take(&mut self.filter));
    }

    /// MARK:回答を判定する (前後の空白と大文字小文字は無視)
    pub fn submit_answer(&mut self, text: &str) -> Result<bool, QuizError> {
        let QuizState::Answering { index } = self.state else {
            return Err(self.invalid("submit an answer"));
        };
        let word = &self.sequence[index];
        let correct = normalize(text) == normalize(self.direction.answer(word));
        debug!(word = %word.id, correct, "Answer submitted");

        self.score.record(correct);
        self.state = QuizState::after_answer(index, correct);
        Ok(correct)
    }

    /// 結果表示中の単語の色マークを切り替えて保存する (`topic` も更新される)
    pub fn mark_color<S: KeyValueStore>(
        &mut self,
        registrar: &Registrar<'_, S>,
        topic: &mut Topic,
        color: Color,
    ) -> Result<(), QuizError> {
        let QuizState::ShowingResult { index, .. } = self.state else {
            return Err(self.invalid("mark a color"));
        };
        let word_id = &self.sequence[index].id;
        *topic = registrar.toggle_color(topic.clone(), word_id, color);

        // 出題リストはそのまま、表示中の単語のマークだけ合わせる
        if let Some(word) = topic.word(word_id) {
            self.sequence[index].color_mark = word.color_mark;
        }
        Ok(())
    }

    pub fn advance(&mut self) -> Result<(), QuizError> {
        let QuizState::ShowingResult { index, .. } = self.state else {
            return Err(self.invalid("advance"));
        };
        self.state = QuizState::after_advance(index, self.sequence.len());
        Ok(())
    }

    /// 同じ出題リストでもう一度
    pub fn restart(&mut self) -> Result<(), QuizError> {
        if self.state != QuizState::Finished {
            return Err(self.invalid("restart"));
        }
        self.score = Score::default();
        self.state = QuizState::start(self.sequence.len());
        Ok(())
    }

    fn invalid(&self, action: &'static str) -> QuizError {
        QuizError::InvalidTransition {
            action,
            phase: self.state.phase(),
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColorMark;
    use crate::repository::TopicRepository;
    use crate::store::MemoryStore;

    fn word(id: &str, english: &str, japanese: &str, mark: ColorMark) -> WordPair {
        WordPair {
            id: id.into(),
            english: english.into(),
            japanese: japanese.into(),
            color_mark: mark,
        }
    }

    fn topic(words: Vec<WordPair>) -> Topic {
        Topic {
            id: "t".into(),
            name: "Animals".into(),
            words,
            created_at: 0,
        }
    }

    fn tri_color() -> Topic {
        topic(vec![
            word("r", "cat", "猫", ColorMark::Red),
            word("y", "dog", "犬", ColorMark::Yellow),
            word("g", "bird", "鳥", ColorMark::Green),
            word("n", "fish", "魚", ColorMark::None),
        ])
    }

    #[test]
    fn answer_is_trimmed_and_case_insensitive() {
        let t = topic(vec![word("w", "cat", "猫", ColorMark::None)]);
        let mut quiz = QuizSession::new(&t, Direction::JapaneseToEnglish, ColorFilter::default());
        assert_eq!(quiz.prompt(), Some("猫"));
        assert_eq!(quiz.submit_answer(" Cat "), Ok(true));
        assert_eq!(
            quiz.state(),
            QuizState::ShowingResult {
                index: 0,
                was_correct: true
            }
        );
    }

    #[test]
    fn english_to_japanese_expects_japanese() {
        let t = topic(vec![word("w", "cat", "猫", ColorMark::None)]);
        let mut quiz = QuizSession::new(&t, Direction::EnglishToJapanese, ColorFilter::default());
        assert_eq!(quiz.prompt(), Some("cat"));
        assert_eq!(quiz.expected_answer(), Some("猫"));
        assert_eq!(quiz.submit_answer("ねこ"), Ok(false));
    }

    #[test]
    fn no_partial_matching() {
        let t = topic(vec![word("w", "ice cream", "アイス", ColorMark::None)]);
        let mut quiz = QuizSession::new(&t, Direction::JapaneseToEnglish, ColorFilter::default());
        assert_eq!(quiz.submit_answer("ice  cream"), Ok(false));
    }

    #[test]
    fn filter_keeps_matching_colors_in_order() {
        let t = tri_color();
        let quiz = QuizSession::new(
            &t,
            Direction::default(),
            ColorFilter::new([Color::Red, Color::Green]),
        );
        let ids: Vec<_> = quiz.sequence().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, ["r", "g"]);
        for w in quiz.sequence() {
            assert!(matches!(w.color_mark, ColorMark::Red | ColorMark::Green));
        }
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let t = tri_color();
        let quiz = QuizSession::new(&t, Direction::default(), ColorFilter::default());
        assert_eq!(quiz.sequence(), t.words.as_slice());
    }

    #[test]
    fn empty_topic_has_no_eligible_words() {
        let t = topic(vec![]);
        let mut quiz = QuizSession::new(&t, Direction::default(), ColorFilter::new([Color::Red]));
        assert_eq!(quiz.state(), QuizState::NoEligibleWords);
        assert_eq!(quiz.empty_reason(), Some(EmptyReason::NoWords));
        assert!(quiz.prompt().is_none());
        assert!(quiz.restart().is_err());
        assert!(quiz.submit_answer("x").is_err());
    }

    #[test]
    fn filtered_out_is_reported_separately() {
        let t = topic(vec![word("n", "fish", "魚", ColorMark::None)]);
        let quiz = QuizSession::new(&t, Direction::default(), ColorFilter::new([Color::Yellow]));
        assert_eq!(quiz.empty_reason(), Some(EmptyReason::FilteredOut));
    }

    #[test]
    fn full_run_scores_and_finishes() {
        let t = tri_color();
        let mut quiz = QuizSession::new(&t, Direction::JapaneseToEnglish, ColorFilter::default());
        let answers = ["cat", "wolf", "BIRD", "fish "];
        for (i, a) in answers.iter().enumerate() {
            assert_eq!(quiz.progress(), Some((i + 1, 4)));
            quiz.submit_answer(a).unwrap();
            quiz.advance().unwrap();
        }
        assert_eq!(quiz.state(), QuizState::Finished);
        assert_eq!(quiz.score(), Score { correct: 3, total: 4 });
        assert_eq!(quiz.score().percentage(), 75);
        assert!(quiz.progress().is_none());

        quiz.restart().unwrap();
        assert_eq!(quiz.state(), QuizState::Answering { index: 0 });
        assert_eq!(quiz.score(), Score::default());
    }

    #[test]
    fn invalid_transitions_keep_state() {
        let t = tri_color();
        let mut quiz = QuizSession::new(&t, Direction::default(), ColorFilter::default());
        assert_eq!(
            quiz.advance(),
            Err(QuizError::InvalidTransition {
                action: "advance",
                phase: QuizPhase::Answering
            })
        );
        quiz.submit_answer("cat").unwrap();
        assert!(quiz.submit_answer("cat").is_err());
        assert_eq!(quiz.score().total, 1);
    }

    #[test]
    fn changing_settings_resets_session() {
        let t = tri_color();
        let mut quiz = QuizSession::new(&t, Direction::default(), ColorFilter::default());
        quiz.submit_answer("cat").unwrap();
        quiz.advance().unwrap();

        quiz.set_direction(&t, Direction::EnglishToJapanese);
        assert_eq!(quiz.state(), QuizState::Answering { index: 0 });
        assert_eq!(quiz.score(), Score::default());

        quiz.submit_answer("猫").unwrap();
        quiz.toggle_filter(&t, Color::Yellow);
        assert_eq!(quiz.state(), QuizState::Answering { index: 0 });
        assert_eq!(quiz.score(), Score::default());
        assert_eq!(quiz.sequence().len(), 1);
        assert!(quiz.filter().contains(Color::Yellow));
    }

    #[test]
    fn percentage_rounds_and_guards_zero() {
        assert_eq!(Score::default().percentage(), 0);
        assert_eq!(Score { correct: 1, total: 3 }.percentage(), 33);
        assert_eq!(Score { correct: 2, total: 3 }.percentage(), 67);
        assert_eq!(Score { correct: 1, total: 2 }.percentage(), 50);
        assert_eq!(Score { correct: 1, total: 8 }.percentage(), 13);
    }

    #[test]
    fn mark_color_toggles_and_persists() {
        let repo = TopicRepository::new(MemoryStore::new());
        let mut t = tri_color();
        repo.upsert_topic(&t);
        let registrar = Registrar::new(&repo);

        let mut quiz = QuizSession::new(&t, Direction::default(), ColorFilter::default());
        assert!(quiz.mark_color(&registrar, &mut t, Color::Red).is_err());

        quiz.submit_answer("cat").unwrap();
        // 赤 → 赤で解除
        quiz.mark_color(&registrar, &mut t, Color::Red).unwrap();
        assert_eq!(t.words[0].color_mark, ColorMark::None);
        assert_eq!(quiz.current_word().unwrap().color_mark, ColorMark::None);

        quiz.mark_color(&registrar, &mut t, Color::Yellow).unwrap();
        assert_eq!(t.words[0].color_mark, ColorMark::Yellow);
        assert_eq!(repo.get_topic("t").unwrap().words[0].color_mark, ColorMark::Yellow);

        // 出題リストは変わらない
        assert_eq!(quiz.sequence().len(), 4);
        quiz.advance().unwrap();
        assert_eq!(quiz.state(), QuizState::Answering { index: 1 });
    }
}
