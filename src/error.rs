// ============================================
// src/error.rs
// エラー型
// ============================================

use thiserror::Error;

use crate::quiz::QuizPhase;

/// キーバリューストアの失敗
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// クイズの状態に合わない操作
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuizError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: QuizPhase,
    },
}

/// CLI 全体のエラー
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Dialog(#[from] dialoguer::Error),

    #[error("Topic not found: {0}")]
    TopicNotFound(String),
}
