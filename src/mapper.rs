//! Row Mapper Module
//!
//! 1行分の`(列名, 値)`から出力レコード（`System`）を構築するモジュール。
//! 3つのマジック列を処理します:
//!
//! 1. `Index`（識別子列）→ `uid`
//! 2. `Parent Sample Name` → `parent_uid`
//! 3. `FILE:...` → ファイルプロパティ
//!
//! それ以外の列はヘッダーから名前と単位を抽出したスカラープロパティになります。

use crate::error::XlsxToPifError;
use crate::files::{FileNames, FileResolver};
use crate::header::{file_column_name, is_parent_column, parse_header};
use crate::record::{Property, ScalarProperty, System};
use crate::value::Value;

/// 識別子列の正規化後のキー
pub(crate) const INDEX_KEY: &str = "Index";

/// 型変換済みの1行
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SheetRow {
    /// 1始まりのスプレッドシート行番号（エラー報告用）
    pub number: usize,
    /// 列順の`(列名, 値)`。識別子列は`INDEX_KEY`に正規化済み
    pub entries: Vec<(String, Value)>,
}

/// 行からレコードへの変換器
#[derive(Debug, Clone)]
pub(crate) struct RowMapper {
    resolver: FileResolver,
    /// エラーメッセージに表示する識別子列の名前
    index_label: String,
}

impl RowMapper {
    pub fn new(resolver: FileResolver, index_label: impl Into<String>) -> Self {
        Self {
            resolver,
            index_label: index_label.into(),
        }
    }

    /// 1行をレコードに変換
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxToPifError::MissingIndex)` - 識別子が存在しない、または空の場合
    /// * `Err(XlsxToPifError::UnrecognizedFileValue)` - `FILE:`列の値がファイル名として解釈できない場合
    pub fn map_row(&self, sheet: &str, row: SheetRow) -> Result<System, XlsxToPifError> {
        let SheetRow {
            number,
            mut entries,
        } = row;

        let missing_index = || XlsxToPifError::MissingIndex {
            sheet: sheet.to_string(),
            column: self.index_label.clone(),
            row: Some(number),
        };

        // 1. 識別子
        let position = entries
            .iter()
            .position(|(key, _)| key == INDEX_KEY)
            .ok_or_else(missing_index)?;
        let (_, index) = entries.remove(position);
        if index.is_blank() {
            return Err(missing_index());
        }
        let uid = index.to_string();

        // 2. 親サンプル（最初に一致した列のみ）
        let mut parent_uid = None;
        if let Some(position) = entries.iter().position(|(key, _)| is_parent_column(key)) {
            let (_, parent) = entries.remove(position);
            if !parent.is_blank() {
                parent_uid = Some(parent.to_string());
            }
        }

        // 3. 残りの列をプロパティへ
        let properties = entries
            .into_iter()
            .map(|(key, value)| self.property(sheet, number, key, value))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::trace!(
            "row {} -> uid {:?}, {} properties",
            number,
            uid,
            properties.len()
        );

        Ok(System::new(uid, parent_uid, properties))
    }

    fn property(
        &self,
        sheet: &str,
        number: usize,
        key: String,
        value: Value,
    ) -> Result<Property, XlsxToPifError> {
        if let Some(name) = file_column_name(&key) {
            let names = FileNames::try_from(&value).map_err(|bad| {
                XlsxToPifError::UnrecognizedFileValue {
                    sheet: sheet.to_string(),
                    row: number,
                    column: key.clone(),
                    value: bad.to_string(),
                }
            })?;
            return Ok(Property::File(self.resolver.resolve(name, names)));
        }

        let header = parse_header(&key)?;
        Ok(Property::Scalar(ScalarProperty {
            name: header.name,
            value,
            units: header.units,
        }))
    }
}
