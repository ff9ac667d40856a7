//! Connection - connections.json の 1 レコード
//!
//! 起動時に一度だけ読み込み、以降は不変。1 connection = 1 bucket。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// 設定ファイル名
pub const CONNECTIONS_FILE: &str = "connections.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub active: bool,
    pub bucket: String,
}

/// ConnectionStore は connections.json から読み込んだ接続の一覧
///
/// # Fail-fast 設計
/// - ファイルが無い・壊れている場合は `ConfigError` を返す
/// - 呼び出し側（CLI）はこれを fatal として扱い、ストレージには一切触らない
#[derive(Debug, Clone, Default)]
pub struct ConnectionStore {
    connections: Vec<Connection>,
}

impl ConnectionStore {
    pub fn new(connections: Vec<Connection>) -> Self {
        Self { connections }
    }

    /// 指定パスの JSON 配列を読み込む
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let connections: Vec<Connection> =
            serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            path = %path.display(),
            total = connections.len(),
            "loaded connections"
        );
        Ok(Self { connections })
    }

    /// 実行ファイルと同じディレクトリ → カレントディレクトリの順に探して読み込む
    pub fn discover() -> Result<Self, ConfigError> {
        let mut candidates = Vec::new();
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join(CONNECTIONS_FILE));
        }
        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd.join(CONNECTIONS_FILE));
        }
        Self::load_first(&candidates)
    }

    /// 最初に存在するパスを読み込む
    pub fn load_first(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => Err(ConfigError::NotFound {
                searched: candidates.to_vec(),
            }),
        }
    }

    pub fn all(&self) -> &[Connection] {
        &self.connections
    }

    /// active な接続だけを返す（inactive は黙ってスキップ）
    pub fn active(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(|c| c.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join(CONNECTIONS_FILE);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_filters_active_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            r#"[
                {"active": true, "bucket": "comp-a"},
                {"active": false, "bucket": "comp-b"},
                {"active": true, "bucket": "comp-c", "region": "ignored"}
            ]"#,
        );

        let store = ConnectionStore::load(&path).unwrap();
        assert_eq!(store.all().len(), 3);

        let active: Vec<&str> = store.active().map(|c| c.bucket.as_str()).collect();
        assert_eq!(active, vec!["comp-a", "comp-c"]);
    }

    #[test]
    fn truncated_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), r#"[{"active": true, "buck"#);

        let err = ConnectionStore::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), r#"[{"bucket": "comp-a"}]"#);

        assert!(matches!(
            ConnectionStore::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConnectionStore::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_first_picks_the_first_existing_file() {
        let empty = tempfile::tempdir().unwrap();
        let full = tempfile::tempdir().unwrap();
        let path = write_file(full.path(), r#"[{"active": true, "bucket": "x"}]"#);

        let store =
            ConnectionStore::load_first(&[empty.path().join(CONNECTIONS_FILE), path]).unwrap();
        assert_eq!(store.active().count(), 1);
    }

    #[test]
    fn load_first_reports_searched_paths() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = dir.path().join(CONNECTIONS_FILE);

        match ConnectionStore::load_first(std::slice::from_ref(&candidate)) {
            Err(ConfigError::NotFound { searched }) => assert_eq!(searched, vec![candidate]),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
