// ============================================
// src/app.rs
// 画面の状態とキー入力の処理 (描画は ui.rs)
// ============================================

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tracing::debug;

use crate::model::{Color, Topic, TopicSummary};
use crate::quiz::{ColorFilter, Direction, QuizSession, QuizState};
use crate::register::Registrar;
use crate::repository::TopicRepository;
use crate::store::KeyValueStore;

// --------------------------------------------------
// 画面ごとの状態
// --------------------------------------------------

/// 今どの画面を表示しているか
#[derive(Debug)]
pub enum Screen {
    TopicList(TopicListView),
    TopicDetail(TopicDetailView),
}

/// トピック一覧画面
#[derive(Debug, Default)]
pub struct TopicListView {
    pub topics: Vec<TopicSummary>,
    pub cursor: usize,
    /// 新しいトピック名の入力中なら `Some`
    pub new_name: Option<String>,
    /// 削除確認中のトピック
    pub confirm_delete: Option<TopicSummary>,
}

/// トピック詳細画面 (登録モード / クイズモード)
#[derive(Debug)]
pub struct TopicDetailView {
    pub topic_id: String,
    /// 見つからなければ `None`
    pub topic: Option<Topic>,
    pub mode: DetailMode,
}

#[derive(Debug)]
pub enum DetailMode {
    Register(RegisterView),
    Quiz(QuizView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterFocus {
    #[default]
    English,
    Japanese,
    Words,
}

/// 登録モード
#[derive(Debug, Default)]
pub struct RegisterView {
    pub english: String,
    pub japanese: String,
    pub focus: RegisterFocus,
    pub cursor: usize,
}

/// クイズモード
#[derive(Debug)]
pub struct QuizView {
    pub session: QuizSession,
    pub answer: String,
}

impl QuizView {
    fn new(topic: &Topic) -> Self {
        Self {
            session: QuizSession::new(topic, Direction::default(), ColorFilter::default()),
            answer: String::new(),
        }
    }
}

/// 画面遷移の指示
enum Outcome {
    Stay,
    Open(String),
    Back,
    Quit,
}

// --------------------------------------------------
// アプリ全体
// --------------------------------------------------

pub struct App<S> {
    repo: TopicRepository<S>,
    screen: Screen,
    should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(repo: TopicRepository<S>) -> Self {
        let mut list = TopicListView::default();
        list.refresh(&repo);
        Self {
            repo,
            screen: Screen::TopicList(list),
            should_quit: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// 選択中のトピック ID (一覧画面なら `None`)
    pub fn selected_topic_id(&self) -> Option<&str> {
        match &self.screen {
            Screen::TopicDetail(detail) => Some(&detail.topic_id),
            Screen::TopicList(_) => None,
        }
    }

    /// MARK:キー入力の処理
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let outcome = match &mut self.screen {
            Screen::TopicList(list) => list.handle_key(&self.repo, key),
            Screen::TopicDetail(detail) => detail.handle_key(&self.repo, key),
        };

        match outcome {
            Outcome::Stay => {}
            Outcome::Open(topic_id) => {
                debug!(topic = %topic_id, "Opening topic");
                self.screen = Screen::TopicDetail(TopicDetailView::load(&self.repo, topic_id));
            }
            Outcome::Back => {
                debug!(topic = ?self.selected_topic_id(), "Back to topic list");
                let mut list = TopicListView::default();
                list.refresh(&self.repo);
                self.screen = Screen::TopicList(list);
            }
            Outcome::Quit => self.should_quit = true,
        }
    }
}

// MARK:一覧画面

impl TopicListView {
    fn refresh<S: KeyValueStore>(&mut self, repo: &TopicRepository<S>) {
        self.topics = repo.summaries();
        self.cursor = self.cursor.min(self.topics.len().saturating_sub(1));
    }

    pub fn selected(&self) -> Option<&TopicSummary> {
        self.topics.get(self.cursor)
    }

    fn handle_key<S: KeyValueStore>(&mut self, repo: &TopicRepository<S>, key: KeyEvent) -> Outcome {
        // 削除確認中は y だけが削除、それ以外はキャンセル
        if let Some(target) = self.confirm_delete.take() {
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                repo.delete_topic(&target.id);
                self.refresh(repo);
            }
            return Outcome::Stay;
        }

        if let Some(name) = self.new_name.as_mut() {
            match key.code {
                KeyCode::Char(c) => name.push(c),
                KeyCode::Backspace => {
                    name.pop();
                }
                KeyCode::Enter => {
                    // 空の名前なら入力欄を開いたままにする
                    if repo.create_topic(name).is_some() {
                        self.new_name = None;
                        self.refresh(repo);
                        self.cursor = self.topics.len().saturating_sub(1);
                    }
                }
                KeyCode::Esc => self.new_name = None,
                _ => {}
            }
            return Outcome::Stay;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.topics.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(topic) = self.selected() {
                    return Outcome::Open(topic.id.clone());
                }
            }
            KeyCode::Char('n') => self.new_name = Some(String::new()),
            KeyCode::Char('d') | KeyCode::Delete => self.confirm_delete = self.selected().cloned(),
            KeyCode::Esc | KeyCode::Char('q') => return Outcome::Quit,
            _ => {}
        }
        Outcome::Stay
    }
}

// MARK:詳細画面

impl TopicDetailView {
    fn load<S: KeyValueStore>(repo: &TopicRepository<S>, topic_id: String) -> Self {
        Self {
            topic: repo.get_topic(&topic_id),
            topic_id,
            mode: DetailMode::Register(RegisterView::default()),
        }
    }

    fn handle_key<S: KeyValueStore>(&mut self, repo: &TopicRepository<S>, key: KeyEvent) -> Outcome {
        if key.code == KeyCode::Esc {
            return Outcome::Back;
        }
        let Some(topic) = self.topic.as_mut() else {
            return Outcome::Stay;
        };

        match key.code {
            KeyCode::F(1) => self.mode = DetailMode::Register(RegisterView::default()),
            // モードを切り替えるたびにクイズは最初から
            KeyCode::F(2) => self.mode = DetailMode::Quiz(QuizView::new(topic)),
            _ => {
                let registrar = Registrar::new(repo);
                match &mut self.mode {
                    DetailMode::Register(view) => view.handle_key(&registrar, topic, key),
                    DetailMode::Quiz(view) => view.handle_key(&registrar, topic, key),
                }
            }
        }
        Outcome::Stay
    }
}

fn color_key(code: KeyCode) -> Option<Color> {
    match code {
        KeyCode::Char('r') => Some(Color::Red),
        KeyCode::Char('y') => Some(Color::Yellow),
        KeyCode::Char('g') => Some(Color::Green),
        _ => None,
    }
}

impl RegisterView {
    fn handle_key<S: KeyValueStore>(&mut self, registrar: &Registrar<'_, S>, topic: &mut Topic, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.focus = match self.focus {
                    RegisterFocus::English => RegisterFocus::Japanese,
                    RegisterFocus::Japanese => RegisterFocus::Words,
                    RegisterFocus::Words => RegisterFocus::English,
                };
                return;
            }
            KeyCode::BackTab => {
                self.focus = match self.focus {
                    RegisterFocus::English => RegisterFocus::Words,
                    RegisterFocus::Japanese => RegisterFocus::English,
                    RegisterFocus::Words => RegisterFocus::Japanese,
                };
                return;
            }
            _ => {}
        }

        match self.focus {
            RegisterFocus::English | RegisterFocus::Japanese => {
                let input = if self.focus == RegisterFocus::English {
                    &mut self.english
                } else {
                    &mut self.japanese
                };
                match key.code {
                    KeyCode::Char(c) => input.push(c),
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Enter => {
                        let before = topic.words.len();
                        *topic = registrar.add_word(topic.clone(), &self.english, &self.japanese);
                        if topic.words.len() > before {
                            self.english.clear();
                            self.japanese.clear();
                            self.focus = RegisterFocus::English;
                        }
                    }
                    _ => {}
                }
            }
            RegisterFocus::Words => {
                if let Some(color) = color_key(key.code) {
                    if let Some(word) = topic.words.get(self.cursor) {
                        let word_id = word.id.clone();
                        *topic = registrar.toggle_color(topic.clone(), &word_id, color);
                    }
                    return;
                }
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
                    KeyCode::Down | KeyCode::Char('j') => {
                        if self.cursor + 1 < topic.words.len() {
                            self.cursor += 1;
                        }
                    }
                    KeyCode::Delete | KeyCode::Char('d') => {
                        if let Some(word) = topic.words.get(self.cursor) {
                            let word_id = word.id.clone();
                            *topic = registrar.remove_word(topic.clone(), &word_id);
                            self.cursor = self.cursor.min(topic.words.len().saturating_sub(1));
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

impl QuizView {
    fn handle_key<S: KeyValueStore>(&mut self, registrar: &Registrar<'_, S>, topic: &mut Topic, key: KeyEvent) {
        // 設定の変更はどの状態でも受け付け、クイズをリセットする
        let setting = match key.code {
            KeyCode::F(3) => {
                let direction = self.session.direction().flipped();
                self.session.set_direction(topic, direction);
                true
            }
            KeyCode::F(4) => {
                self.session.toggle_filter(topic, Color::Red);
                true
            }
            KeyCode::F(5) => {
                self.session.toggle_filter(topic, Color::Yellow);
                true
            }
            KeyCode::F(6) => {
                self.session.toggle_filter(topic, Color::Green);
                true
            }
            _ => false,
        };
        if setting {
            self.answer.clear();
            return;
        }

        // 状態に合わない操作は無視する
        match self.session.state() {
            QuizState::Answering { .. } => match key.code {
                KeyCode::Char(c) => self.answer.push(c),
                KeyCode::Backspace => {
                    self.answer.pop();
                }
                KeyCode::Enter => {
                    let _ = self.session.submit_answer(&self.answer);
                }
                _ => {}
            },
            QuizState::ShowingResult { .. } => {
                if let Some(color) = color_key(key.code) {
                    let _ = self.session.mark_color(registrar, topic, color);
                } else if key.code == KeyCode::Enter && self.session.advance().is_ok() {
                    self.answer.clear();
                }
            }
            QuizState::Finished => {
                if key.code == KeyCode::Enter && self.session.restart().is_ok() {
                    self.answer.clear();
                }
            }
            QuizState::NoEligibleWords => {}
        }
    }
}
