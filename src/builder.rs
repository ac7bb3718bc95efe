//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::api::{CoercionMode, IndexColumn, RecordErrorPolicy, SheetSelector};
use crate::coerce::CellCoercer;
use crate::error::XlsxToPifError;
use crate::files::FileResolver;
use crate::mapper::{RowMapper, SheetRow, INDEX_KEY};
use crate::parser::WorkbookParser;
use crate::record::System;
use crate::security::SecurityConfig;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// 識別子（uid）の取得元
    pub index_column: IndexColumn,

    /// ヘッダー行（使用範囲の先頭から0始まり）
    pub header_row: usize,

    /// ファイル参照の基準ディレクトリ（Noneの場合はカレントディレクトリ）
    pub base_dir: Option<PathBuf>,

    /// レコード単位のエラーの扱い
    pub record_error_policy: RecordErrorPolicy,

    /// 文字列セルの型変換モード
    pub coercion_mode: CoercionMode,

    /// 参照ファイルのダイジェストを計算するか
    pub hashing: bool,

    /// シート内の行を並列に変換するか
    pub parallel: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::All,
            index_column: IndexColumn::RowNumber,
            header_row: 0,
            base_dir: None,
            record_error_policy: RecordErrorPolicy::Abort,
            coercion_mode: CoercionMode::Strict,
            hashing: true,
            parallel: true,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxpif::{ConverterBuilder, IndexColumn, SheetSelector};
///
/// # fn main() -> Result<(), xlsxpif::XlsxToPifError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_selector(SheetSelector::Index(0))
///     .with_index_column(IndexColumn::Column("Sample Name".to_string()))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    config: ConversionConfig,
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: すべてのシート
    /// - 識別子: データ行の位置（0始まり）
    /// - ヘッダー行: 0
    /// - ファイル参照の基準: カレントディレクトリ
    /// - レコード単位のエラー: 変換を中断
    /// - 型変換: `CoercionMode::Strict`
    /// - ダイジェスト計算: 有効
    /// - 並列処理: 有効
    pub fn new() -> Self {
        Self::default()
    }

    /// 変換対象のシートを選択する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxpif::{ConverterBuilder, SheetSelector};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_sheet_selector(SheetSelector::Names(vec!["Alloys".to_string()]));
    /// ```
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// サンプル識別子を取得する列を指定する
    ///
    /// `IndexColumn::Column`で指定した列はプロパティから除外されます。
    pub fn with_index_column(mut self, index: IndexColumn) -> Self {
        self.config.index_column = index;
        self
    }

    /// ヘッダー行を指定する（シートの使用範囲の先頭から0始まり）
    ///
    /// それより上の行は無視されます。
    pub fn with_header_row(mut self, row: usize) -> Self {
        self.config.header_row = row;
        self
    }

    /// ファイル参照を解決する基準ディレクトリを指定する
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = Some(dir.into());
        self
    }

    /// レコード単位のエラー（`FILE:`列の不正な値など）の扱いを指定する
    pub fn with_record_error_policy(mut self, policy: RecordErrorPolicy) -> Self {
        self.config.record_error_policy = policy;
        self
    }

    /// 文字列セルの型変換モードを指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxpif::{CoercionMode, ConverterBuilder};
    ///
    /// // "[a.txt, b.txt]" を ["a.txt", "b.txt"] として扱う
    /// let builder = ConverterBuilder::new()
    ///     .with_coercion_mode(CoercionMode::SplitBareLists);
    /// ```
    pub fn with_coercion_mode(mut self, mode: CoercionMode) -> Self {
        self.config.coercion_mode = mode;
        self
    }

    /// 参照ファイルのSHA-256ダイジェストを計算するかを指定する
    pub fn with_hashing(mut self, hashing: bool) -> Self {
        self.config.hashing = hashing;
        self
    }

    /// シート内の行をrayonで並列に変換するかを指定する
    ///
    /// 出力順序はどちらでも同じです。
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `XlsxToPifError::Config(String)`: 設定の検証に失敗した場合
    ///   * 識別子列の名前が空
    ///   * シートの複数指定が空
    ///   * 基準ディレクトリが存在しない
    pub fn build(self) -> Result<Converter, XlsxToPifError> {
        // 1. 識別子列の検証
        if let IndexColumn::Column(ref name) = self.config.index_column {
            if name.trim().is_empty() {
                return Err(XlsxToPifError::Config(
                    "Index column name must not be empty".to_string(),
                ));
            }
        }

        // 2. シート選択の検証
        let no_sheets = match &self.config.sheet_selector {
            SheetSelector::Indices(indices) => indices.is_empty(),
            SheetSelector::Names(names) => names.is_empty(),
            _ => false,
        };
        if no_sheets {
            return Err(XlsxToPifError::Config("No sheets selected".to_string()));
        }

        // 3. 基準ディレクトリの検証
        if let Some(ref dir) = self.config.base_dir {
            if !dir.is_dir() {
                return Err(XlsxToPifError::Config(format!(
                    "Base directory '{}' does not exist",
                    dir.display()
                )));
            }
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換時にスキップされた行
#[derive(Debug)]
pub struct SkippedRecord {
    /// シート名
    pub sheet: String,
    /// 1始まりの行番号
    pub row: usize,
    /// スキップの原因
    pub error: XlsxToPifError,
}

/// 変換結果
#[derive(Debug, Default)]
pub struct Conversion {
    /// 出力レコード（シート順、シート内は行順）
    pub records: Vec<System>,
    /// `RecordErrorPolicy::Skip`でスキップされた行
    pub skipped: Vec<SkippedRecord>,
}

/// 変換処理のファサード
///
/// ワークブックをPIFレコードに変換するためのメインエントリーポイントです。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxpif::ConverterBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), xlsxpif::XlsxToPifError> {
/// let converter = ConverterBuilder::new().build()?;
/// let input = File::open("samples.xlsx")?;
/// let output = File::create("samples-pif.json")?;
/// converter.convert_to_writer(input, output)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    config: ConversionConfig,
    security: SecurityConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            config,
            security: SecurityConfig::default(),
        }
    }

    /// ワークブックをレコードに変換
    ///
    /// # 処理フロー
    ///
    /// 1. WorkbookParserの初期化とシート選択
    /// 2. 各シートについて（ワークブック内の順序で）
    ///    - 表として読み込み、全セルを型変換
    ///    - 各行をレコードに変換（並列、結果は行順）
    ///    - レコード単位のエラーを`RecordErrorPolicy`に従って処理
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxToPifError::MissingIndex)` - 識別子列が存在しない、または識別子が空の行がある場合
    /// * `Err(XlsxToPifError::UnrecognizedFileValue)` - `RecordErrorPolicy::Abort`で不正な`FILE:`値があった場合
    pub fn convert<R: Read>(&self, input: R) -> Result<Conversion, XlsxToPifError> {
        let span = tracing::info_span!("convert");
        let _enter = span.enter();

        let mut parser = WorkbookParser::open(input, &self.security)?;
        let sheet_names = parser.select_sheets(&self.config.sheet_selector)?;

        let coercer = CellCoercer::new(self.config.coercion_mode);
        let mapper = RowMapper::new(
            FileResolver::new(self.config.base_dir.clone(), self.config.hashing),
            match &self.config.index_column {
                IndexColumn::RowNumber => INDEX_KEY,
                IndexColumn::Column(name) => name.as_str(),
            },
        );

        let mut conversion = Conversion::default();

        for sheet_name in &sheet_names {
            let sheet_span = tracing::info_span!("sheet", name = %sheet_name);
            let _sheet = sheet_span.enter();

            let rows = parser
                .load_sheet(sheet_name, self.config.header_row)?
                .into_rows(&self.config.index_column, &coercer)?;

            let results = self.map_rows(&mapper, &sheet_span, sheet_name, rows);

            for (row, result) in results {
                match result {
                    Ok(record) => conversion.records.push(record),
                    Err(error)
                        if error.is_record_error()
                            && self.config.record_error_policy == RecordErrorPolicy::Skip =>
                    {
                        tracing::warn!("skipping row {}: {}", row, error);
                        conversion.skipped.push(SkippedRecord {
                            sheet: sheet_name.clone(),
                            row,
                            error,
                        });
                    }
                    Err(error) => return Err(error),
                }
            }
        }

        tracing::info!(
            "converted {} records ({} skipped) from {} sheets",
            conversion.records.len(),
            conversion.skipped.len(),
            sheet_names.len()
        );

        Ok(conversion)
    }

    /// 行をレコードに変換（結果は入力と同じ順序）
    fn map_rows(
        &self,
        mapper: &RowMapper,
        sheet_span: &tracing::Span,
        sheet_name: &str,
        rows: Vec<SheetRow>,
    ) -> Vec<(usize, Result<System, XlsxToPifError>)> {
        let map = |row: SheetRow| {
            let number = row.number;
            (number, mapper.map_row(sheet_name, row))
        };

        if self.config.parallel {
            rows.into_par_iter()
                .map(|row| {
                    // rayonワーカー上でもシートのスパンを有効にする
                    let _enter = sheet_span.enter();
                    map(row)
                })
                .collect()
        } else {
            rows.into_iter().map(map).collect()
        }
    }

    /// ファイルパスを指定して変換
    pub fn convert_path(&self, path: impl AsRef<Path>) -> Result<Conversion, XlsxToPifError> {
        let file = File::open(path.as_ref())?;
        self.convert(file)
    }

    /// 変換し、レコードの配列を整形済みJSONとして書き込む
    ///
    /// スキップされた行を確認できるよう、変換結果も返します。
    pub fn convert_to_writer<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<Conversion, XlsxToPifError> {
        let conversion = self.convert(input)?;

        let mut writer = BufWriter::new(output);
        serde_json::to_writer_pretty(&mut writer, &conversion.records)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(conversion)
    }

    /// 変換し、レコードの配列を整形済みJSON文字列として返す
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use std::fs::File;
    /// use xlsxpif::ConverterBuilder;
    ///
    /// # fn main() -> Result<(), xlsxpif::XlsxToPifError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let json = converter.convert_to_string(File::open("samples.xlsx")?)?;
    /// println!("{}", json);
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert_to_string<R: Read>(&self, input: R) -> Result<String, XlsxToPifError> {
        let conversion = self.convert(input)?;
        Ok(serde_json::to_string_pretty(&conversion.records)?)
    }
}
