//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// シート選択方式
///
/// 変換対象のシートを選択する方法を指定します。
/// 選択されたシートは常にワークブック内の出現順ではなく、指定順で処理されます
/// （`All`の場合はワークブック内の順序）。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetSelector {
    /// すべてのシートを変換（デフォルト）
    All,

    /// インデックス指定（0始まり）
    ///
    /// 例: `SheetSelector::Index(0)` は最初のシートを選択
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("Samples".to_string())`
    Name(String),

    /// 複数のインデックス指定
    ///
    /// 例: `SheetSelector::Indices(vec![0, 2])`
    Indices(Vec<usize>),

    /// 複数のシート名指定
    Names(Vec<String>),
}

/// サンプル識別子（uid）の取得元
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IndexColumn {
    /// データ行の位置（0始まり）を識別子とする（デフォルト）
    ///
    /// ヘッダー行の直後の行が`"0"`になります。空行も位置としてカウントされます。
    RowNumber,

    /// 指定した列の値を識別子とする
    ///
    /// 例: `IndexColumn::Column("Sample Name".to_string())`
    ///
    /// 指定列はプロパティから除外されます。列がシートに存在しない場合は
    /// `XlsxToPifError::MissingIndex`で変換全体が中断されます。
    Column(String),
}

/// レコード単位のエラー（不正な`FILE:`セル値など）が発生した場合の処理方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordErrorPolicy {
    /// 変換全体を中断してエラーを返す（デフォルト）
    Abort,

    /// 該当行をスキップし、`Conversion::skipped`に記録して変換を継続する
    Skip,
}

/// セル値の型変換モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoercionMode {
    /// リテラルとして解析できない文字列は元の文字列のまま（デフォルト）
    ///
    /// 例: `"[a.txt, b.txt]"` → `"[a.txt, b.txt]"`
    Strict,

    /// リテラルとして解析できない文字列のうち、角括弧で囲まれているか
    /// カンマを含むものを、カンマ区切りの文字列リストとして扱う
    ///
    /// 例: `"[a.txt, b.txt]"` → `["a.txt", "b.txt"]`
    ///
    /// 空の要素も残します（`"a, b,"` → `["a", "b", ""]`）。
    SplitBareLists,
}
