//! LiteralToken Module
//!
//! セルリテラルの字句解析（トークン化）を提供します。

use super::LiteralError;

/// リテラルトークン
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LiteralToken {
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// 整数リテラル（例: `42`, `0x1F`, `1_000`）
    Int(i64),
    /// 浮動小数点数リテラル（例: `1.5`, `.5`, `1e-3`）
    Float(f64),
    /// 文字列リテラル（例: `'a.txt'`, `"b"`）
    Str(String),
    /// 識別子（`True` / `False` / `None`のみ意味を持つ）
    Ident(String),
}

/// 位置情報付きトークン
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: LiteralToken,
    /// 入力文字列中のバイト位置
    pub pos: usize,
}

/// 字句解析器
pub(crate) struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            source,
        }
    }

    /// 入力全体をトークン列に変換
    pub fn tokenize(mut self) -> Result<Vec<Spanned>, LiteralError> {
        let mut tokens = Vec::new();

        while let Some(&(pos, ch)) = self.chars.peek() {
            let token = match ch {
                c if c.is_whitespace() => {
                    self.chars.next();
                    continue;
                }
                '[' => self.single(LiteralToken::LBracket),
                ']' => self.single(LiteralToken::RBracket),
                '(' => self.single(LiteralToken::LParen),
                ')' => self.single(LiteralToken::RParen),
                '{' => self.single(LiteralToken::LBrace),
                '}' => self.single(LiteralToken::RBrace),
                ',' => self.single(LiteralToken::Comma),
                ':' => self.single(LiteralToken::Colon),
                '+' => self.single(LiteralToken::Plus),
                '-' => self.single(LiteralToken::Minus),
                '\'' | '"' => self.string(pos, ch)?,
                c if c.is_ascii_digit() || c == '.' => self.number(pos)?,
                c if c.is_alphabetic() || c == '_' => self.ident(),
                other => {
                    return Err(LiteralError::new(
                        pos,
                        format!("unexpected character '{}'", other),
                    ))
                }
            };
            tokens.push(Spanned { token, pos });
        }

        Ok(tokens)
    }

    fn single(&mut self, token: LiteralToken) -> LiteralToken {
        self.chars.next();
        token
    }

    fn ident(&mut self) -> LiteralToken {
        let mut name = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        LiteralToken::Ident(name)
    }

    /// 文字列リテラル（単一引用符・二重引用符、バックスラッシュエスケープ対応）
    fn string(&mut self, start: usize, quote: char) -> Result<LiteralToken, LiteralError> {
        self.chars.next();
        let mut text = String::new();

        loop {
            let Some((pos, c)) = self.chars.next() else {
                return Err(LiteralError::new(start, "unterminated string"));
            };
            match c {
                c if c == quote => return Ok(LiteralToken::Str(text)),
                '\n' => return Err(LiteralError::new(pos, "newline in string")),
                '\\' => self.escape(pos, &mut text)?,
                other => text.push(other),
            }
        }
    }

    fn escape(&mut self, pos: usize, text: &mut String) -> Result<(), LiteralError> {
        let Some((_, c)) = self.chars.next() else {
            return Err(LiteralError::new(pos, "unterminated escape"));
        };
        match c {
            'n' => text.push('\n'),
            't' => text.push('\t'),
            'r' => text.push('\r'),
            '0' => text.push('\0'),
            '\\' | '\'' | '"' => text.push(c),
            '\n' => {}
            'x' => text.push(self.hex_escape(pos, 2)?),
            'u' => text.push(self.hex_escape(pos, 4)?),
            'U' => text.push(self.hex_escape(pos, 8)?),
            // 未知のエスケープはバックスラッシュごと保持
            other => {
                text.push('\\');
                text.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, pos: usize, digits: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .chars
                .next()
                .and_then(|(_, c)| c.to_digit(16))
                .ok_or_else(|| LiteralError::new(pos, "truncated hex escape"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| LiteralError::new(pos, "invalid code point"))
    }

    /// 数値リテラル
    ///
    /// 10進整数・浮動小数点数に加え、`0x`/`0o`/`0b`接頭辞と桁区切りの`_`を受け付けます。
    fn number(&mut self, start: usize) -> Result<LiteralToken, LiteralError> {
        let mut end = start;
        while let Some(&(pos, c)) = self.chars.peek() {
            let exponent_sign = (c == '+' || c == '-')
                && matches!(self.source[start..pos].chars().last(), Some('e' | 'E'))
                && !is_prefixed(&self.source[start..pos]);
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign {
                self.chars.next();
                end = pos + c.len_utf8();
            } else {
                break;
            }
        }

        let text = &self.source[start..end];
        parse_number(text).ok_or_else(|| {
            LiteralError::new(start, format!("invalid number literal '{}'", text))
        })
    }
}

fn is_prefixed(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.starts_with("0x") || lower.starts_with("0o") || lower.starts_with("0b")
}

/// 数値リテラル文字列を解析
fn parse_number(text: &str) -> Option<LiteralToken> {
    if text == "." {
        return None;
    }
    if !valid_underscores(text) {
        return None;
    }
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = lower.strip_prefix(prefix) {
            return i64::from_str_radix(digits, radix).ok().map(LiteralToken::Int);
        }
    }

    if lower.chars().all(|c| c.is_ascii_digit()) {
        // 先頭ゼロの10進整数は不正（"0", "00"は可）
        if lower.len() > 1 && lower.starts_with('0') && lower.chars().any(|c| c != '0') {
            return None;
        }
        return lower.parse::<i64>().ok().map(LiteralToken::Int);
    }

    // 複素数（"1j"）や"inf"などは受け付けない
    if lower
        .chars()
        .any(|c| !(c.is_ascii_digit() || c == '.' || c == 'e' || c == '+' || c == '-'))
    {
        return None;
    }
    lower.parse::<f64>().ok().map(LiteralToken::Float)
}

/// `_`は数字の間にのみ許可
fn valid_underscores(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.iter().enumerate().all(|(i, &c)| {
        c != '_'
            || (i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_ascii_hexdigit()
                && chars[i + 1].is_ascii_hexdigit())
    })
}
