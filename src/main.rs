// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::fs::{self, OpenOptions};
use std::io::{self, stdout};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use console::style;
use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dialoguer::Confirm;
use ratatui::prelude::*;
use tracing::info;

mod app;
mod config;
mod error;
mod model;
mod quiz;
mod register;
mod repository;
mod save_data;
mod store;
mod ui;

use app::App;
use config::{Cli, Command, Config};
use error::AppError;
use repository::TopicRepository;
use store::{FileStore, KeyValueStore, MemoryStore};

// --------------------------------------------------
// メイン関数
// --------------------------------------------------

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    init_logging(&config);
    info!(data_dir = %config.data_dir.display(), in_memory = config.in_memory, "Starting");

    if config.in_memory {
        run(TopicRepository::new(MemoryStore::new()), cli.command)
    } else {
        run(TopicRepository::new(FileStore::new(config.data_dir.clone())), cli.command)
    }
}

/// ログはファイルへ (標準出力は TUI が使う)
fn init_logging(config: &Config) {
    let writer: Box<dyn io::Write + Send> = if config.in_memory {
        Box::new(io::sink())
    } else {
        let _ = fs::create_dir_all(&config.data_dir);
        match OpenOptions::new().create(true).append(true).open(config.log_file()) {
            Ok(file) => Box::new(file),
            Err(_) => Box::new(io::sink()),
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(writer))
        .init();
}

fn run<S: KeyValueStore>(repo: TopicRepository<S>, command: Option<Command>) -> Result<(), AppError> {
    match command {
        None => run_tui(repo),
        Some(Command::List) => {
            list_topics(&repo);
            Ok(())
        }
        Some(Command::Delete { id, yes }) => delete_topic(&repo, &id, yes),
    }
}

// --------------------------------------------------
// サブコマンド
// --------------------------------------------------

fn list_topics<S: KeyValueStore>(repo: &TopicRepository<S>) {
    let summaries = repo.summaries();
    if summaries.is_empty() {
        println!("{}", style("トピックがありません").dim());
        return;
    }
    for t in summaries {
        println!(
            "{}  {}  {}",
            style(&t.id).dim(),
            style(&t.name).bold(),
            style(format!("({}語)", t.word_count)).cyan()
        );
    }
}

/// MARK:確認してからトピックを削除する
fn delete_topic<S: KeyValueStore>(repo: &TopicRepository<S>, id: &str, yes: bool) -> Result<(), AppError> {
    let topic = repo
        .get_topic(id)
        .ok_or_else(|| AppError::TopicNotFound(id.to_string()))?;

    let confirmed = yes
        || Confirm::new()
            .with_prompt(format!("「{}」を削除しますか？", topic.name))
            .default(false)
            .interact()?;

    if confirmed {
        repo.delete_topic(id);
        println!("{} {}", style("削除しました:").green(), topic.name);
    }
    Ok(())
}

// --------------------------------------------------
// TUIセットアップと実行ループ
// --------------------------------------------------

fn run_tui<S: KeyValueStore>(repo: TopicRepository<S>) -> Result<(), AppError> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, App::new(repo));
    restore_terminal()?;
    result
}

fn setup_terminal() -> io::Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?; // 代替スクリーンを使用
    stdout().execute(Hide)?; // カーソルを非表示
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn restore_terminal() -> io::Result<()> {
    stdout().execute(Show)?; // カーソルを再表示
    stdout().execute(LeaveAlternateScreen)?; // 代替スクリーンを終了
    disable_raw_mode()?;
    Ok(())
}

fn run_app<S: KeyValueStore>(terminal: &mut Terminal<impl Backend>, mut app: App<S>) -> Result<(), AppError> {
    while !app.should_quit() {
        terminal.draw(|f| ui::ui(f, app.screen()))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}
