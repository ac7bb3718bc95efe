//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsxpifクレート全体で使用するエラー型
///
/// ワークブックの読み込み、行からレコードへの変換、JSON出力の過程で発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの分類
///
/// - 構造エラー（変換全体を中断）: `MissingIndex`, `Parse`, `Config`
/// - レコード単位のエラー: `UnrecognizedFileValue`
///   （`RecordErrorPolicy::Skip`の場合はスキップされ、`Conversion::skipped`に記録される）
///
/// 行に関するエラーには、シート名と1始まりのスプレッドシート行番号が含まれます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxpif::XlsxToPifError;
/// use std::fs::File;
///
/// fn open_workbook(path: &str) -> Result<(), XlsxToPifError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxToPifError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// JSONシリアライズ中に発生したエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時、またはシート選択時に無効な設定が
    /// 検出された場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 識別子（uid）列が存在しない、または識別子セルが空
    ///
    /// `row`が`None`の場合はシートのヘッダーに列そのものが存在しません（構造エラー）。
    /// `Some(n)`の場合は`n`行目の識別子セルが空です。
    #[error("{}", missing_index_message(sheet, column, *row))]
    MissingIndex {
        /// シート名
        sheet: String,
        /// 識別子列のヘッダー
        column: String,
        /// 1始まりの行番号
        row: Option<usize>,
    },

    /// `FILE:`列のセル値がファイル名として解釈できない型
    #[error(
        "Unrecognized file reference value at sheet '{sheet}', row {row}, column '{column}': {value}"
    )]
    UnrecognizedFileValue {
        /// シート名
        sheet: String,
        /// 1始まりの行番号
        row: usize,
        /// 列ヘッダー
        column: String,
        /// 問題のセル値（表示形式）
        value: String,
    },

    /// ヘッダーの単位表記を解析できない（内部不変条件の違反）
    #[error("Malformed header '{header}': unit group could not be extracted")]
    HeaderPattern {
        /// 問題のヘッダー
        header: String,
    },

    /// セキュリティ制限に違反したエラー
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

fn missing_index_message(sheet: &str, column: &str, row: Option<usize>) -> String {
    match row {
        Some(row) => format!(
            "Missing sample identity at sheet '{}', row {}: column '{}' is empty",
            sheet, row, column
        ),
        None => format!(
            "Missing index column '{}' in sheet '{}'",
            column, sheet
        ),
    }
}

impl XlsxToPifError {
    /// レコード単位のエラーかどうか
    ///
    /// `true`の場合、`RecordErrorPolicy::Skip`で当該行をスキップして変換を継続できます。
    pub fn is_record_error(&self) -> bool {
        matches!(self, XlsxToPifError::UnrecognizedFileValue { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: XlsxToPifError = io_err.into();

        match error {
            XlsxToPifError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_parse_error_display() {
        let error: XlsxToPifError = calamine::Error::Msg("Corrupted file").into();
        let msg = error.to_string();
        assert!(msg.contains("Failed to parse workbook"));
        assert!(msg.contains("Corrupted file"));
    }

    #[test]
    fn test_missing_index_column_display() {
        let error = XlsxToPifError::MissingIndex {
            sheet: "Samples".to_string(),
            column: "Sample Name".to_string(),
            row: None,
        };
        let msg = error.to_string();
        assert!(msg.contains("Missing index column 'Sample Name'"));
        assert!(msg.contains("Samples"));
    }

    #[test]
    fn test_missing_index_row_display() {
        let error = XlsxToPifError::MissingIndex {
            sheet: "Samples".to_string(),
            column: "Sample Name".to_string(),
            row: Some(7),
        };
        let msg = error.to_string();
        assert!(msg.contains("row 7"));
        assert!(msg.contains("is empty"));
    }

    #[test]
    fn test_unrecognized_file_value_display() {
        let error = XlsxToPifError::UnrecognizedFileValue {
            sheet: "Sheet1".to_string(),
            row: 3,
            column: "FILE: Micrograph".to_string(),
            value: "42".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("Sheet1"));
        assert!(msg.contains("row 3"));
        assert!(msg.contains("FILE: Micrograph"));
        assert!(msg.ends_with("42"));
    }

    #[test]
    fn test_is_record_error() {
        let record_err = XlsxToPifError::UnrecognizedFileValue {
            sheet: "Sheet1".to_string(),
            row: 2,
            column: "FILE: x".to_string(),
            value: "true".to_string(),
        };
        assert!(record_err.is_record_error());
        assert!(!XlsxToPifError::Config("x".to_string()).is_record_error());
        assert!(!XlsxToPifError::MissingIndex {
            sheet: "s".to_string(),
            column: "c".to_string(),
            row: None,
        }
        .is_record_error());
    }

    // ?演算子の動作確認
    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), XlsxToPifError> {
            let _file = std::fs::File::open("nonexistent_workbook.xlsx")?;
            Ok(())
        }

        assert!(matches!(io_operation(), Err(XlsxToPifError::Io(_))));
    }
}
