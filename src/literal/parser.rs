//! LiteralParser Module
//!
//! トークン列から`Value`を構築する再帰下降パーサー。
//! 受け付けるのはリテラル（数値、文字列、論理値、`None`、リスト、タプル、辞書、集合）のみで、
//! 演算子は数値の単項符号を除いて一切評価しません。

use super::tokens::{LiteralToken, Spanned};
use super::LiteralError;
use crate::value::Value;

/// 入れ子の最大深さ
const MAX_DEPTH: usize = 64;

/// リテラルパーサー
pub(crate) struct LiteralParser {
    tokens: Vec<Spanned>,
    cursor: usize,
    /// 入力末尾の位置（エラー報告用）
    end: usize,
}

impl LiteralParser {
    pub fn new(tokens: Vec<Spanned>, end: usize) -> Self {
        Self {
            tokens,
            cursor: 0,
            end,
        }
    }

    /// 入力全体を1つの値として解析
    ///
    /// トップレベルのカンマ区切り（`1, 2`）はタプルとして扱います。
    pub fn parse(mut self) -> Result<Value, LiteralError> {
        if self.tokens.is_empty() {
            return Err(LiteralError::new(0, "empty literal"));
        }

        let first = self.parse_value(0)?;
        let value = if self.peek() == Some(&LiteralToken::Comma) {
            let mut items = vec![first];
            while self.eat(&LiteralToken::Comma) {
                if self.peek().is_none() {
                    break;
                }
                items.push(self.parse_value(0)?);
            }
            Value::List(items)
        } else {
            first
        };

        if let Some(spanned) = self.tokens.get(self.cursor) {
            return Err(LiteralError::new(
                spanned.pos,
                format!("unexpected trailing token {:?}", spanned.token),
            ));
        }

        Ok(value)
    }

    fn peek(&self) -> Option<&LiteralToken> {
        self.tokens.get(self.cursor).map(|s| &s.token)
    }

    fn pos(&self) -> usize {
        self.tokens.get(self.cursor).map_or(self.end, |s| s.pos)
    }

    fn next(&mut self) -> Option<LiteralToken> {
        let token = self.tokens.get(self.cursor).map(|s| s.token.clone());
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn eat(&mut self, expected: &LiteralToken) -> bool {
        if self.peek() == Some(expected) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &LiteralToken) -> Result<(), LiteralError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(LiteralError::new(
                self.pos(),
                format!("expected {:?}", expected),
            ))
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth > MAX_DEPTH {
            return Err(LiteralError::new(self.pos(), "literal nested too deeply"));
        }

        let pos = self.pos();
        match self.next() {
            Some(LiteralToken::Int(i)) => Ok(Value::Int(i)),
            Some(LiteralToken::Float(f)) => Ok(Value::Float(f)),
            Some(LiteralToken::Str(s)) => Ok(Value::String(self.concat_strings(s))),
            Some(LiteralToken::Plus) => self.parse_signed(false),
            Some(LiteralToken::Minus) => self.parse_signed(true),
            Some(LiteralToken::Ident(name)) => match name.as_str() {
                "True" => Ok(Value::Bool(true)),
                "False" => Ok(Value::Bool(false)),
                "None" => Ok(Value::Null),
                _ => Err(LiteralError::new(pos, format!("unknown name '{}'", name))),
            },
            Some(LiteralToken::LBracket) => {
                let items = self.parse_items(&LiteralToken::RBracket, depth)?;
                Ok(Value::List(items))
            }
            Some(LiteralToken::LParen) => self.parse_paren(depth),
            Some(LiteralToken::LBrace) => self.parse_brace(depth),
            Some(other) => Err(LiteralError::new(
                pos,
                format!("unexpected token {:?}", other),
            )),
            None => Err(LiteralError::new(pos, "unexpected end of literal")),
        }
    }

    /// 隣接する文字列リテラルの連結（`'a' 'b'` → `"ab"`）
    fn concat_strings(&mut self, mut text: String) -> String {
        while let Some(LiteralToken::Str(next)) = self.peek() {
            text.push_str(next);
            self.cursor += 1;
        }
        text
    }

    /// 数値への単項符号
    fn parse_signed(&mut self, negative: bool) -> Result<Value, LiteralError> {
        let pos = self.pos();
        match self.next() {
            Some(LiteralToken::Int(i)) => Ok(Value::Int(if negative { -i } else { i })),
            Some(LiteralToken::Float(f)) => Ok(Value::Float(if negative { -f } else { f })),
            _ => Err(LiteralError::new(pos, "sign must be followed by a number")),
        }
    }

    /// 閉じ括弧までのカンマ区切り要素（末尾カンマ可）
    fn parse_items(
        &mut self,
        close: &LiteralToken,
        depth: usize,
    ) -> Result<Vec<Value>, LiteralError> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.parse_value(depth + 1)?);
            if !self.eat(&LiteralToken::Comma) {
                self.expect(close)?;
                return Ok(items);
            }
        }
    }

    /// `(...)`: 空タプル、括弧付きの単一値、またはタプル
    fn parse_paren(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if self.eat(&LiteralToken::RParen) {
            return Ok(Value::List(Vec::new()));
        }

        let first = self.parse_value(depth + 1)?;
        if self.eat(&LiteralToken::RParen) {
            return Ok(first);
        }

        self.expect(&LiteralToken::Comma)?;
        let mut items = vec![first];
        items.extend(self.parse_items(&LiteralToken::RParen, depth)?);
        Ok(Value::List(items))
    }

    /// `{...}`: 辞書または集合
    fn parse_brace(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if self.eat(&LiteralToken::RBrace) {
            return Ok(Value::Dict(Vec::new()));
        }

        let key_pos = self.pos();
        let first = self.parse_value(depth + 1)?;
        ensure_hashable(&first, key_pos)?;

        if !self.eat(&LiteralToken::Colon) {
            // 集合: 重複を除いたリスト
            let mut items = vec![first];
            if self.eat(&LiteralToken::Comma) {
                loop {
                    if self.eat(&LiteralToken::RBrace) {
                        return Ok(Value::List(items));
                    }
                    let pos = self.pos();
                    let item = self.parse_value(depth + 1)?;
                    ensure_hashable(&item, pos)?;
                    if !items.contains(&item) {
                        items.push(item);
                    }
                    if !self.eat(&LiteralToken::Comma) {
                        break;
                    }
                }
            }
            self.expect(&LiteralToken::RBrace)?;
            return Ok(Value::List(items));
        }

        let mut entries: Vec<(String, Value)> = Vec::new();
        let value = self.parse_value(depth + 1)?;
        insert_entry(&mut entries, dict_key(&first), value);

        while self.eat(&LiteralToken::Comma) {
            if self.eat(&LiteralToken::RBrace) {
                return Ok(Value::Dict(entries));
            }
            let pos = self.pos();
            let key = self.parse_value(depth + 1)?;
            ensure_hashable(&key, pos)?;
            self.expect(&LiteralToken::Colon)?;
            let value = self.parse_value(depth + 1)?;
            insert_entry(&mut entries, dict_key(&key), value);
        }

        self.expect(&LiteralToken::RBrace)?;
        Ok(Value::Dict(entries))
    }
}

fn ensure_hashable(value: &Value, pos: usize) -> Result<(), LiteralError> {
    match value {
        Value::List(_) | Value::Dict(_) => Err(LiteralError::new(pos, "unhashable key")),
        _ => Ok(()),
    }
}

fn dict_key(key: &Value) -> String {
    key.to_string()
}

/// 重複キーは最初の位置を保ったまま値を上書き
fn insert_entry(entries: &mut Vec<(String, Value)>, key: String, value: Value) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_literal;
    use crate::value::Value;

    fn s(text: &str) -> Value {
        Value::String(text.to_string())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse_literal("3").unwrap(), Value::Int(3));
        assert_eq!(parse_literal("-2.5").unwrap(), Value::Float(-2.5));
        assert_eq!(parse_literal("+7").unwrap(), Value::Int(7));
        assert_eq!(parse_literal("True").unwrap(), Value::Bool(true));
        assert_eq!(parse_literal("None").unwrap(), Value::Null);
        assert_eq!(parse_literal("'x'").unwrap(), s("x"));
        assert_eq!(parse_literal("'a' \"b\"").unwrap(), s("ab"));
    }

    #[test]
    fn test_list() {
        assert_eq!(
            parse_literal("['a.txt', 'b.txt']").unwrap(),
            Value::List(vec![s("a.txt"), s("b.txt")])
        );
        assert_eq!(
            parse_literal("[1, [2, 3],]").unwrap(),
            Value::List(vec![
                Value::Int(1),
                Value::List(vec![Value::Int(2), Value::Int(3)])
            ])
        );
        assert_eq!(parse_literal("[]").unwrap(), Value::List(vec![]));
    }

    #[test]
    fn test_tuple() {
        assert_eq!(parse_literal("()").unwrap(), Value::List(vec![]));
        assert_eq!(parse_literal("(1)").unwrap(), Value::Int(1));
        assert_eq!(
            parse_literal("(1,)").unwrap(),
            Value::List(vec![Value::Int(1)])
        );
        assert_eq!(
            parse_literal("1, 2").unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(
            parse_literal("'a',").unwrap(),
            Value::List(vec![s("a")])
        );
    }

    #[test]
    fn test_dict() {
        assert_eq!(
            parse_literal("{'T': 300, 'P': (1.0, 'atm')}").unwrap(),
            Value::Dict(vec![
                ("T".to_string(), Value::Int(300)),
                (
                    "P".to_string(),
                    Value::List(vec![Value::Float(1.0), s("atm")])
                ),
            ])
        );
        assert_eq!(parse_literal("{}").unwrap(), Value::Dict(vec![]));
        assert_eq!(
            parse_literal("{1: 'a', 1: 'b'}").unwrap(),
            Value::Dict(vec![("1".to_string(), s("b"))])
        );
    }

    #[test]
    fn test_set() {
        assert_eq!(
            parse_literal("{1, 2, 1}").unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_rejects_non_literals() {
        assert!(parse_literal("").is_err());
        assert!(parse_literal("S-001").is_err());
        assert!(parse_literal("a.txt").is_err());
        assert!(parse_literal("1 + 2").is_err());
        assert!(parse_literal("foo(1)").is_err());
        assert!(parse_literal("[1, 2").is_err());
        assert!(parse_literal("-'a'").is_err());
        assert!(parse_literal("{[1]: 2}").is_err());
        assert!(parse_literal("nan").is_err());
        assert!(parse_literal("1 2").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
        assert!(parse_literal(&deep).is_err());

        let shallow = format!("{}{}", "[".repeat(10), "]".repeat(10));
        assert!(parse_literal(&shallow).is_ok());
    }
}
