// ============================================
// src/ui.rs
// 画面の描画
// ============================================

use ratatui::{
    prelude::*,
    style::{Color as TermColor, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{DetailMode, QuizView, RegisterFocus, RegisterView, Screen, TopicDetailView, TopicListView};
use crate::model::{Color, ColorMark, Topic};
use crate::quiz::{EmptyReason, QuizState};

pub fn ui(f: &mut Frame, screen: &Screen) {
    match screen {
        Screen::TopicList(list) => draw_topic_list(f, list),
        Screen::TopicDetail(detail) => draw_topic_detail(f, detail),
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Red => TermColor::Red,
        Color::Yellow => TermColor::Yellow,
        Color::Green => TermColor::Green,
    }
}

/// 色マークを ●/○ で表示する
fn mark_spans(mark: ColorMark) -> Vec<Span<'static>> {
    Color::ALL
        .iter()
        .map(|&c| {
            let symbol = if mark.is(c) { "● " } else { "○ " };
            Span::styled(symbol, Style::default().fg(term_color(c)))
        })
        .collect()
}

fn help_line(text: &str) -> Paragraph<'_> {
    Paragraph::new(text).style(Style::default().fg(TermColor::DarkGray))
}

// --------------------------------------------------
// トピック一覧
// --------------------------------------------------

fn draw_topic_list(f: &mut Frame, view: &TopicListView) {
    let size = f.area();
    let block = Block::default().borders(Borders::ALL).title("即単語 - トピック一覧");
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // [0] 一覧
            Constraint::Length(1), // [1] 入力欄 / 確認
            Constraint::Length(1), // [2] 操作説明
        ])
        .split(inner_area);

    let items: Vec<ListItem> = view
        .topics
        .iter()
        .map(|t| ListItem::new(format!("{}  ({}語)", t.name, t.word_count)))
        .collect();
    let list = if items.is_empty() {
        List::new(vec![ListItem::new("トピックがありません。n で作成してください。").dark_gray()])
    } else {
        List::new(items)
            .highlight_style(Style::default().fg(TermColor::Black).bg(TermColor::White))
            .highlight_symbol("> ")
    };
    let mut state = ListState::default().with_selected(Some(view.cursor));
    f.render_stateful_widget(list, chunks[0], &mut state);

    if let Some(target) = &view.confirm_delete {
        f.render_widget(
            Paragraph::new(format!("「{}」を削除しますか？ (y/n)", target.name))
                .style(Style::default().fg(TermColor::Red).bold()),
            chunks[1],
        );
    } else if let Some(name) = &view.new_name {
        f.render_widget(
            Paragraph::new(format!("トピック名: {name}_")).style(Style::default().fg(TermColor::Yellow)),
            chunks[1],
        );
    }

    f.render_widget(
        help_line("↑↓: 選択  Enter: 開く  n: 新規作成  d: 削除  Esc: 終了"),
        chunks[2],
    );
}

// --------------------------------------------------
// トピック詳細
// --------------------------------------------------

fn draw_topic_detail(f: &mut Frame, view: &TopicDetailView) {
    let size = f.area();
    let Some(topic) = &view.topic else {
        let block = Block::default().borders(Borders::ALL).title("即単語");
        f.render_widget(
            Paragraph::new("トピックが見つかりません (Esc: 戻る)")
                .centered()
                .block(block),
            size,
        );
        return;
    };

    let mode_label = match view.mode {
        DetailMode::Register(_) => "登録モード",
        DetailMode::Quiz(_) => "1問1答モード",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} - {}", topic.name, mode_label));
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    match &view.mode {
        DetailMode::Register(register) => draw_register(f, inner_area, topic, register),
        DetailMode::Quiz(quiz) => draw_quiz(f, inner_area, quiz),
    }
}

fn input_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default().fg(TermColor::Black).bg(TermColor::White)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(label),
        Span::styled(value, style),
        Span::styled(if focused { "_" } else { "" }, style),
    ])
}

fn draw_register(f: &mut Frame, area: Rect, topic: &Topic, view: &RegisterView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] 英単語
            Constraint::Length(1), // [1] 日本語訳
            Constraint::Length(1), // [2] 空白
            Constraint::Length(1), // [3] 件数
            Constraint::Min(1),    // [4] 単語一覧
            Constraint::Length(1), // [5] 操作説明
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(input_line("英単語  : ", &view.english, view.focus == RegisterFocus::English)),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(input_line("日本語訳: ", &view.japanese, view.focus == RegisterFocus::Japanese)),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(format!("登録済み単語 ({})", topic.words.len())).bold(),
        chunks[3],
    );

    let items: Vec<ListItem> = topic
        .words
        .iter()
        .map(|w| {
            let mut spans = mark_spans(w.color_mark);
            spans.push(Span::raw(format!("{}  {}", w.english, w.japanese)));
            ListItem::new(Line::from(spans))
        })
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().fg(TermColor::Black).bg(TermColor::White))
        .highlight_symbol("> ");
    let selected = (view.focus == RegisterFocus::Words && !topic.words.is_empty()).then_some(view.cursor);
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, chunks[4], &mut state);

    f.render_widget(
        help_line("Tab: 入力欄/一覧  Enter: 追加  r/y/g: 色マーク  d: 削除  F2: クイズ  Esc: 戻る"),
        chunks[5],
    );
}

fn draw_quiz(f: &mut Frame, area: Rect, view: &QuizView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] 設定 (向き・フィルター)
            Constraint::Length(1), // [1] 進捗
            Constraint::Length(1), // [2] 空白
            Constraint::Length(1), // [3] 問題
            Constraint::Length(1), // [4] 空白
            Constraint::Min(1),    // [5] 回答 / 結果
            Constraint::Length(1), // [6] 操作説明
        ])
        .split(area);

    let session = &view.session;

    // 0. 設定
    let mut settings = vec![Span::raw(format!(
        "{}  出題数: {}  フィルター: ",
        session.direction().label(),
        session.sequence().len()
    ))];
    for c in Color::ALL {
        let style = if session.filter().contains(c) {
            Style::default().fg(TermColor::Black).bg(term_color(c))
        } else {
            Style::default().fg(term_color(c))
        };
        settings.push(Span::styled(c.label(), style));
        settings.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(settings)), chunks[0]);

    match session.state() {
        QuizState::NoEligibleWords => {
            let message = match session.empty_reason() {
                Some(EmptyReason::FilteredOut) => "選択した色の単語がありません。",
                _ => "単語が登録されていません。登録モードで単語を追加してください。",
            };
            f.render_widget(Paragraph::new(message).centered(), chunks[3]);
        }
        QuizState::Finished => {
            let score = session.score();
            f.render_widget(
                Paragraph::new("クイズ完了！").bold().centered(),
                chunks[3],
            );
            f.render_widget(
                Paragraph::new(vec![
                    Line::from(format!("{} / {}", score.correct, score.total)),
                    Line::from(format!("{}%", score.percentage())),
                    Line::from("Enter: もう一度挑戦").dark_gray(),
                ])
                .style(Style::default().fg(TermColor::Yellow))
                .centered(),
                chunks[5],
            );
        }
        QuizState::Answering { .. } | QuizState::ShowingResult { .. } => {
            if let Some((current, total)) = session.progress() {
                f.render_widget(
                    Paragraph::new(format!("{current} / {total}")).centered(),
                    chunks[1],
                );
            }
            f.render_widget(
                Paragraph::new(session.prompt().unwrap_or_default())
                    .style(Style::default().fg(TermColor::White).bold())
                    .centered(),
                chunks[3],
            );

            if let QuizState::ShowingResult { was_correct, .. } = session.state() {
                let (label, color) = if was_correct {
                    ("正解！", TermColor::Green)
                } else {
                    ("不正解", TermColor::Red)
                };
                let mark = session.current_word().map(|w| w.color_mark).unwrap_or_default();
                let mut marks = vec![Span::raw("色マーク: ")];
                marks.extend(mark_spans(mark));
                f.render_widget(
                    Paragraph::new(vec![
                        Line::from(label).style(Style::default().fg(color).bold()),
                        Line::from(format!("正解: {}", session.expected_answer().unwrap_or_default())),
                        Line::from(marks),
                    ])
                    .centered(),
                    chunks[5],
                );
            } else {
                f.render_widget(
                    Paragraph::new(input_line("回答: ", &view.answer, true)).centered(),
                    chunks[5],
                );
            }
        }
    }

    f.render_widget(
        help_line("Enter: 回答/次へ  r/y/g: 色マーク  F3: 向き  F4-F6: 色フィルター  F1: 登録  Esc: 戻る"),
        chunks[6],
    );
}
