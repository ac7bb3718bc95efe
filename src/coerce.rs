//! Cell Coercion Module
//!
//! 生のセル値を`Value`へ変換するモジュール。
//! 文字列セルにリスト・タプル・辞書などのリテラルが書かれている場合は構造化された値に、
//! 解析できない場合は元の文字列のまま返します（常に成功する純粋関数）。

use crate::api::CoercionMode;
use crate::literal::parse_literal;
use crate::types::CellValue;
use crate::value::Value;

/// セル値の型変換器
#[derive(Debug, Clone, Copy)]
pub(crate) struct CellCoercer {
    mode: CoercionMode,
}

impl Default for CellCoercer {
    fn default() -> Self {
        Self::new(CoercionMode::Strict)
    }
}

impl CellCoercer {
    pub fn new(mode: CoercionMode) -> Self {
        Self { mode }
    }

    /// 1セルを変換
    ///
    /// 文字列以外の値はそのまま`Value`へ写像します（空セルは`Null`）。
    pub fn coerce(&self, raw: &CellValue) -> Value {
        match raw {
            CellValue::Int(i) => Value::Int(*i),
            CellValue::Float(f) => Value::Float(*f),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Empty => Value::Null,
            CellValue::String(s) => self.coerce_str(s),
        }
    }

    /// 文字列を変換
    ///
    /// # 処理フロー
    ///
    /// 1. 前後の空白を除去
    /// 2. 先頭の`[`と末尾の`]`をそれぞれ最大1つ除去（括弧の不整合を許容）
    /// 3. リテラルとして解析
    /// 4. 失敗した場合は`CoercionMode`に従ってフォールバック
    pub fn coerce_str(&self, raw: &str) -> Value {
        let trimmed = raw.trim();
        let (inner, bracketed) = strip_brackets(trimmed);

        // "[]"や"[ ]"は空リスト
        if bracketed && inner.trim().is_empty() {
            return Value::List(Vec::new());
        }

        match parse_literal(inner) {
            Ok(value) => value,
            Err(_) => match self.mode {
                CoercionMode::SplitBareLists if bracketed || inner.contains(',') => Value::List(
                    inner
                        .split(',')
                        .map(str::trim)
                        .map(|piece| Value::String(piece.to_string()))
                        .collect(),
                ),
                _ => Value::String(raw.to_string()),
            },
        }
    }

    /// 行全体を変換
    pub fn coerce_row(&self, row: &[CellValue]) -> Vec<Value> {
        row.iter().map(|cell| self.coerce(cell)).collect()
    }
}

fn strip_brackets(text: &str) -> (&str, bool) {
    let (text, leading) = match text.strip_prefix('[') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    let (text, trailing) = match text.strip_suffix(']') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    (text, leading || trailing)
}
