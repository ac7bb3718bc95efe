//! Header Parser Module
//!
//! 列ヘッダー（例: `"Hardness (HV)"`）からプロパティ名と単位を抽出するモジュール。

use std::sync::LazyLock;

use regex::Regex;

use crate::error::XlsxToPifError;

/// `<名前>(<単位>)<以降は無視>`
static UNITS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^(]*)\(([^)]*)\)").expect("Valid header units regex pattern")
});

/// `FILE:`列の接頭辞（大文字小文字を区別）
pub(crate) const FILE_PREFIX: &str = "FILE:";

/// 解析済みヘッダー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    /// プロパティ名
    pub name: String,
    /// 単位（括弧書きがない場合は`None`）
    pub units: Option<String>,
}

/// ヘッダーを解析
///
/// 最初の括弧書きを単位として扱い、その前の文字列（前後の空白を除去）を名前とします。
/// 括弧書きがなければヘッダー全体が名前になります。
///
/// # 例
///
/// ```rust
/// use xlsxpif::parse_header;
///
/// let header = parse_header("Hardness (HV)").unwrap();
/// assert_eq!(header.name, "Hardness");
/// assert_eq!(header.units.as_deref(), Some("HV"));
///
/// let header = parse_header("Sample Name").unwrap();
/// assert_eq!(header.name, "Sample Name");
/// assert_eq!(header.units, None);
/// ```
///
/// # 戻り値
///
/// * `Err(XlsxToPifError::HeaderPattern)` - パターンに一致したのにグループが取得できない場合
///   （通常は発生しない）
pub fn parse_header(header: &str) -> Result<ParsedHeader, XlsxToPifError> {
    let Some(captures) = UNITS_REGEX.captures(header) else {
        return Ok(ParsedHeader {
            name: header.to_string(),
            units: None,
        });
    };

    match (captures.get(1), captures.get(2)) {
        (Some(name), Some(units)) => Ok(ParsedHeader {
            name: name.as_str().trim().to_string(),
            units: Some(units.as_str().trim().to_string()),
        }),
        _ => Err(XlsxToPifError::HeaderPattern {
            header: header.to_string(),
        }),
    }
}

/// `FILE:`列ならプロパティ名を返す
///
/// 接頭辞を除き、前後の空白を除去した文字列が名前になります。
pub fn file_column_name(header: &str) -> Option<&str> {
    header.strip_prefix(FILE_PREFIX).map(str::trim)
}

/// 親サンプル名の列かどうか（大文字小文字・前後の空白を無視した完全一致）
pub fn is_parent_column(header: &str) -> bool {
    header.trim().eq_ignore_ascii_case("parent sample name")
}
