//! Sheet Table Module
//!
//! シートのセル範囲を「ヘッダー + データ行」の表として扱うモジュール。

use calamine::{Data, Range};

use crate::api::IndexColumn;
use crate::coerce::CellCoercer;
use crate::error::XlsxToPifError;
use crate::mapper::{SheetRow, INDEX_KEY};
use crate::types::CellValue;
use crate::value::Value;

/// データ行
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableRow {
    /// 1始まりのスプレッドシート行番号
    pub number: usize,
    /// ヘッダー直後を0とするデータ行の位置
    pub position: usize,
    /// 列数に揃えたセル値
    pub cells: Vec<CellValue>,
}

/// ヘッダー付きのシート
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SheetTable {
    /// シート名
    pub name: String,
    /// 正規化済みの列名
    pub columns: Vec<String>,
    /// データ行（空行は除外済み）
    pub rows: Vec<TableRow>,
}

impl SheetTable {
    /// calamineのセル範囲から表を構築
    ///
    /// # 引数
    ///
    /// * `name` - シート名
    /// * `range` - シートの使用範囲
    /// * `header_row` - 使用範囲の先頭から数えたヘッダー行（0始まり）
    pub fn from_range(name: &str, range: &Range<Data>, header_row: usize) -> Self {
        let first_row = range.start().map_or(0, |(row, _)| row as usize);
        let mut rows = range.rows().skip(header_row);

        let Some(header) = rows.next() else {
            tracing::warn!(
                "sheet '{}' has no header row at offset {}",
                name,
                header_row
            );
            return Self {
                name: name.to_string(),
                columns: Vec::new(),
                rows: Vec::new(),
            };
        };

        let header_cells: Vec<CellValue> = header.iter().map(CellValue::from_data).collect();
        let columns = normalize_headers(&header_cells);
        let width = columns.len();

        let rows = rows
            .enumerate()
            .filter_map(|(position, row)| {
                let mut cells: Vec<CellValue> = row.iter().map(CellValue::from_data).collect();
                if cells.iter().all(CellValue::is_empty) {
                    return None;
                }
                cells.resize(width, CellValue::Empty);
                Some(TableRow {
                    number: first_row + header_row + position + 2,
                    position,
                    cells,
                })
            })
            .collect();

        Self {
            name: name.to_string(),
            columns,
            rows,
        }
    }

    /// 全セルを型変換し、識別子列を`INDEX_KEY`へ正規化した行に変換
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxToPifError::MissingIndex)` - 指定された識別子列がシートに存在しない場合
    pub fn into_rows(
        self,
        index: &IndexColumn,
        coercer: &CellCoercer,
    ) -> Result<Vec<SheetRow>, XlsxToPifError> {
        // ヘッダー行のない空シート
        if self.columns.is_empty() {
            return Ok(Vec::new());
        }

        let index_column = match index {
            IndexColumn::RowNumber => None,
            IndexColumn::Column(column) => Some(
                self.columns
                    .iter()
                    .position(|c| c == column)
                    .ok_or_else(|| XlsxToPifError::MissingIndex {
                        sheet: self.name.clone(),
                        column: column.clone(),
                        row: None,
                    })?,
            ),
        };

        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                let values = coercer.coerce_row(&row.cells);
                let mut entries = Vec::with_capacity(values.len() + 1);

                match index_column {
                    Some(idx) => {
                        entries.push((INDEX_KEY.to_string(), values[idx].clone()));
                        entries.extend(
                            self.columns
                                .iter()
                                .cloned()
                                .zip(values)
                                .enumerate()
                                .filter(|(i, _)| *i != idx)
                                .map(|(_, entry)| entry),
                        );
                    }
                    None => {
                        entries.push((INDEX_KEY.to_string(), Value::Int(row.position as i64)));
                        entries.extend(self.columns.iter().cloned().zip(values));
                    }
                }

                SheetRow {
                    number: row.number,
                    entries,
                }
            })
            .collect();

        Ok(rows)
    }
}

/// ヘッダーを正規化
///
/// - 空のヘッダーは`Unnamed: <列番号>`
/// - 重複したヘッダーには`.1`, `.2`...を付与
fn normalize_headers(cells: &[CellValue]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(cells.len());

    for (col, cell) in cells.iter().enumerate() {
        let base = cell
            .as_header()
            .unwrap_or_else(|| format!("Unnamed: {}", col));

        let mut name = base.clone();
        let mut suffix = 1;
        while columns.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        columns.push(name);
    }

    columns
}
