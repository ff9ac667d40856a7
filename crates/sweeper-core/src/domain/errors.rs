//! Errors - エラー型と分類
//!
//! - `ConfigError`: 起動時の設定エラー（connections.json）。常に fatal
//! - `SweepError`: ストレージ操作のエラー。`ErrorKind` で運用分類する

use std::path::PathBuf;

use thiserror::Error;

/// ErrorKind は実行エラーの分類
///
/// - Transient: 一時的なエラー（リトライ推奨）
/// - Permanent: 恒久的なエラー（リトライ無意味）
/// - Infrastructure: クライアント構築・認証情報の解決失敗（run 全体が fatal）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
    Infrastructure,
}

/// ConfigError は connections.json の読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("connections file not found (searched: {searched:?})")]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// SweepError はバケット操作のエラー
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to list objects in {bucket} under '{prefix}': {message}")]
    List {
        kind: ErrorKind,
        bucket: String,
        prefix: String,
        message: String,
    },

    #[error("failed to delete objects in {bucket}: {message}")]
    Delete {
        kind: ErrorKind,
        bucket: String,
        message: String,
    },

    #[error("{failed} object(s) rejected by delete in {bucket} (first: {first_key}: {first_code})")]
    DeleteRejected {
        bucket: String,
        failed: usize,
        first_key: String,
        first_code: String,
    },

    #[error("refusing to sweep an empty prefix in {bucket}")]
    EmptyPrefix { bucket: String },

    #[error("failed to build storage client for {bucket}: {message}")]
    Client { bucket: String, message: String },
}

impl SweepError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SweepError::List { kind, .. } | SweepError::Delete { kind, .. } => *kind,
            SweepError::DeleteRejected { .. } | SweepError::EmptyPrefix { .. } => {
                ErrorKind::Permanent
            }
            SweepError::Client { .. } => ErrorKind::Infrastructure,
        }
    }

    /// リトライ対象かどうか
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// run 全体を止めるべきエラーかどうか
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Infrastructure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_error_keeps_its_kind() {
        let err = SweepError::List {
            kind: ErrorKind::Transient,
            bucket: "b".to_string(),
            prefix: "entry/2024-03/".to_string(),
            message: "timeout".to_string(),
        };
        assert!(err.is_transient());
        assert!(!err.is_fatal());
        assert_eq!(
            err.to_string(),
            "failed to list objects in b under 'entry/2024-03/': timeout"
        );
    }

    #[test]
    fn client_error_is_fatal() {
        let err = SweepError::Client {
            bucket: "b".to_string(),
            message: "no credentials".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert!(err.is_fatal());
    }

    #[test]
    fn rejected_delete_is_not_retried() {
        let err = SweepError::DeleteRejected {
            bucket: "b".to_string(),
            failed: 2,
            first_key: "entry/images/a.jpg".to_string(),
            first_code: "AccessDenied".to_string(),
        };
        assert!(!err.is_transient());
        assert!(err.to_string().contains("2 object(s)"));
    }
}
