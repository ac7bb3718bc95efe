//! File Reference Module
//!
//! `FILE:`列のセル値からファイル参照プロパティを構築するモジュール。
//! ローカルに存在するファイルについては内容のSHA-256ダイジェストを計算します。

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::record::{FileProperty, FileReference};
use crate::value::Value;

/// `FILE:`セル値の解釈結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNames {
    /// ファイル指定なし（空セル、空文字列）
    Absent,
    /// 単一のファイル名
    Single(String),
    /// 複数のファイル名（順序を保持）
    Many(Vec<String>),
}

impl FileNames {
    /// ファイル名のリストに展開
    pub fn into_vec(self) -> Vec<String> {
        match self {
            FileNames::Absent => Vec::new(),
            FileNames::Single(name) => vec![name],
            FileNames::Many(names) => names,
        }
    }
}

impl TryFrom<&Value> for FileNames {
    /// 解釈できない値（数値、論理値、辞書）はそのまま返す
    type Error = Value;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            v if v.is_blank() => {
                tracing::debug!("file reference value is empty");
                Ok(FileNames::Absent)
            }
            Value::String(name) => {
                tracing::debug!("file reference value {:?} is a single name", name);
                Ok(FileNames::Single(name.clone()))
            }
            Value::List(items) => {
                tracing::debug!("file reference value is a list of {} names", items.len());
                Ok(FileNames::Many(items.iter().map(Value::to_string).collect()))
            }
            other => {
                tracing::debug!(
                    "file reference value of kind {} is not a file name",
                    other.kind()
                );
                Err(other.clone())
            }
        }
    }
}

/// ファイル参照の解決器
///
/// 相対パスを`base_dir`基準で解決し、ファイルが存在すればダイジェストを計算します。
#[derive(Debug, Clone)]
pub(crate) struct FileResolver {
    /// 相対パスの基準ディレクトリ（`None`の場合はカレントディレクトリ）
    base_dir: Option<PathBuf>,
    /// ダイジェストを計算するか
    hashing: bool,
}

impl Default for FileResolver {
    fn default() -> Self {
        Self::new(None, true)
    }
}

impl FileResolver {
    pub fn new(base_dir: Option<PathBuf>, hashing: bool) -> Self {
        Self { base_dir, hashing }
    }

    /// `FILE:`列からファイルプロパティを構築
    ///
    /// # 引数
    ///
    /// * `name` - `FILE:`接頭辞を除いたプロパティ名
    /// * `names` - セル値から得たファイル名
    pub fn resolve(&self, name: &str, names: FileNames) -> FileProperty {
        let files = names
            .into_vec()
            .into_iter()
            .map(|relative_path| self.reference(relative_path))
            .collect();

        FileProperty {
            name: name.to_string(),
            files,
        }
    }

    fn reference(&self, relative_path: String) -> FileReference {
        let sha256 = if self.hashing {
            self.digest(&relative_path)
        } else {
            None
        };

        FileReference {
            relative_path,
            sha256,
        }
    }

    fn locate(&self, relative_path: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(relative_path),
            None => PathBuf::from(relative_path),
        }
    }

    /// ファイルが存在する場合のみダイジェストを計算
    ///
    /// 読み込みに失敗した場合は存在しない場合と同様に`None`を返します。
    fn digest(&self, relative_path: &str) -> Option<String> {
        let path = self.locate(relative_path);
        if !path.is_file() {
            tracing::debug!("referenced file {} not found locally", path.display());
            return None;
        }

        match sha256_file(&path) {
            Ok(digest) => Some(digest),
            Err(e) => {
                tracing::warn!("failed to hash referenced file {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// ファイル内容のSHA-256ダイジェスト（16進小文字）
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
