//! Literal Module
//!
//! セルに書かれたリテラル表記（`[1, 2]`、`{'T': 300}`、`'a.txt'`など）の
//! 安全な構文解析を提供します。任意の式の評価は行いません。

mod parser;
mod tokens;

use thiserror::Error;

use crate::value::Value;
use parser::LiteralParser;
use tokens::Lexer;

/// リテラル解析エラー
///
/// セルの型変換では常に元の文字列へのフォールバックに使われ、
/// 呼び出し元へ伝播することはありません。
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid literal at {pos}: {message}")]
pub(crate) struct LiteralError {
    /// 入力文字列中のバイト位置
    pub pos: usize,
    pub message: String,
}

impl LiteralError {
    pub fn new(pos: usize, message: impl Into<String>) -> Self {
        Self {
            pos,
            message: message.into(),
        }
    }
}

/// 文字列をリテラルとして解析
pub(crate) fn parse_literal(source: &str) -> Result<Value, LiteralError> {
    let tokens = Lexer::new(source).tokenize()?;
    LiteralParser::new(tokens, source.len()).parse()
}
