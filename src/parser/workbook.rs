//! Workbook Parser Module
//!
//! calamineを使用したワークブックの読み込み。
//! 形式（xlsx/xlsm/xlsb/xls/ods）は内容から自動判別します。

use std::io::{Cursor, Read};

use calamine::{open_workbook_auto_from_rs, Reader, Sheets};

use crate::api::SheetSelector;
use crate::error::XlsxToPifError;
use crate::parser::SheetTable;
use crate::security::SecurityConfig;

/// ワークブックパーサー
///
/// calamineのラッパーとして、シート選択とシートの表への読み込みを提供します。
pub(crate) struct WorkbookParser {
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// 入力全体をメモリに読み込み、サイズ制限を検証してから解析します。
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxToPifError::SecurityViolation)` - 入力サイズが上限を超えた場合
    /// * `Err(XlsxToPifError::Parse)` - ワークブックとして解析できない場合
    pub fn open<R: Read>(
        mut reader: R,
        security: &SecurityConfig,
    ) -> Result<Self, XlsxToPifError> {
        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;
        security.check_input_size(bytes_read as u64)?;

        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        Ok(Self { workbook })
    }

    /// すべてのシート名（ワークブック内の順序）
    pub fn get_sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// シート選択方式に基づいてシートを選択
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<String>)` - 選択されたシート名（指定順）
    /// * `Err(XlsxToPifError::Config)` - シートが見つからない、またはインデックスが範囲外の場合
    pub fn select_sheets(&self, selector: &SheetSelector) -> Result<Vec<String>, XlsxToPifError> {
        let all_sheet_names = self.get_sheet_names();

        let by_index = |index: usize| {
            all_sheet_names.get(index).cloned().ok_or_else(|| {
                XlsxToPifError::Config(format!(
                    "Sheet index {} is out of range (total: {})",
                    index,
                    all_sheet_names.len()
                ))
            })
        };
        let by_name = |name: &String| {
            if all_sheet_names.contains(name) {
                Ok(name.clone())
            } else {
                Err(XlsxToPifError::Config(format!("Sheet '{}' not found", name)))
            }
        };

        match selector {
            SheetSelector::All => Ok(all_sheet_names.clone()),
            SheetSelector::Index(index) => Ok(vec![by_index(*index)?]),
            SheetSelector::Name(name) => Ok(vec![by_name(name)?]),
            SheetSelector::Indices(indices) => indices.iter().map(|&i| by_index(i)).collect(),
            SheetSelector::Names(names) => names.iter().map(by_name).collect(),
        }
    }

    /// シートを表として読み込む
    ///
    /// # 引数
    ///
    /// * `sheet_name` - シート名
    /// * `header_row` - 使用範囲の先頭から数えたヘッダー行（0始まり）
    pub fn load_sheet(
        &mut self,
        sheet_name: &str,
        header_row: usize,
    ) -> Result<SheetTable, XlsxToPifError> {
        tracing::info!("reading sheet '{}'", sheet_name);
        let range = self.workbook.worksheet_range(sheet_name)?;
        let table = SheetTable::from_range(sheet_name, &range, header_row);
        tracing::debug!(
            "sheet '{}': {} columns, {} data rows",
            sheet_name,
            table.columns.len(),
            table.rows.len()
        );
        Ok(table)
    }
}

// 実際のワークブックが必要なため、テストは統合テスト（tests/）で実装します。
