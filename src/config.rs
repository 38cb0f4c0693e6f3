// ============================================
// src/config.rs
// コマンドライン引数と保存先の決定
// ============================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use tracing::Level;

const LOG_FILE: &str = "sokutango.log";

/// 即単語 - ターミナルで使う単語帳
#[derive(Debug, Parser)]
#[command(name = "sokutango", version, about)]
pub struct Cli {
    /// データの保存先ディレクトリ (省略時は OS 標準のデータディレクトリ)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// ファイルに保存せず、メモリ上だけで動かす
    #[arg(long, global = true)]
    pub in_memory: bool,

    /// ログを詳しくする (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// トピックの一覧を表示する
    List,
    /// トピックを削除する
    Delete {
        /// 削除するトピックの ID
        id: String,
        /// 確認せずに削除する
        #[arg(short, long)]
        yes: bool,
    },
}

/// 起動時に決まる設定
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub in_memory: bool,
    pub log_level: Level,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            data_dir: cli.data_dir.clone().unwrap_or_else(default_data_dir),
            in_memory: cli.in_memory,
            log_level: log_level(cli.verbose),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

// MARK:保存先ディレクトリを取得する関数
fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("jp", "sokutango", "sokutango") {
        return proj_dirs.data_dir().to_path_buf();
    }

    // 取得できなかったらカレントディレクトリに（フォールバック）
    PathBuf::from(".")
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_delete_with_global_flags() {
        let cli = Cli::parse_from(["sokutango", "--data-dir", "/tmp/x", "delete", "abc", "-y", "-vv"]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.log_file(), PathBuf::from("/tmp/x/sokutango.log"));
        match cli.command {
            Some(Command::Delete { id, yes }) => {
                assert_eq!(id, "abc");
                assert!(yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_runs_tui() {
        let cli = Cli::parse_from(["sokutango", "--in-memory"]);
        assert!(cli.command.is_none());
        assert!(cli.in_memory);
        assert_eq!(Config::from_cli(&cli).log_level, Level::WARN);
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
