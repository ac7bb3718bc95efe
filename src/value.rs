//! Coerced Value Module
//!
//! 型変換後のセル値を表す`Value`型を定義するモジュール。

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// 型変換後のセル値
///
/// 文字列セルに書かれたリスト・タプル・辞書リテラルは、`List`・`Dict`として
/// 構造化された値になります。タプルと集合は`List`として表現されます。
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 値なし（空セル、`None`リテラル）
    Null,

    /// 論理値
    Bool(bool),

    /// 整数
    Int(i64),

    /// 浮動小数点数
    Float(f64),

    /// 文字列
    String(String),

    /// 順序付きシーケンス（リスト・タプル・集合）
    List(Vec<Value>),

    /// 挿入順を保持するマッピング（キーは文字列化される）
    Dict(Vec<(String, Value)>),
}

impl Value {
    /// 値が欠損（Null、NaN）かどうか
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// 値が欠損または空文字列かどうか
    pub fn is_blank(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            other => other.is_missing(),
        }
    }

    /// 値の種類名（ログ・エラーメッセージ用）
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            other => write!(f, "{}", other),
        }
    }
}

fn fmt_float(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if value.is_nan() {
        write!(f, "nan")
    } else if value.is_infinite() {
        write!(f, "{}inf", if value < 0.0 { "-" } else { "" })
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        write!(f, "{:.1}", value)
    } else {
        write!(f, "{}", value)
    }
}

/// 文字列化
///
/// トップレベルの文字列は引用符なし、入れ子の文字列は`'...'`で表示します。
/// 浮動小数点数は整数値でも小数点を付けて表示します（`5.0`）。
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => fmt_float(*v, f),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}': ", key)?;
                    value.fmt_nested(f)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// JSONへのシリアライズ
///
/// NaN・無限大はJSONで表現できないため`null`として出力します。
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(v) if !v.is_finite() => serializer.serialize_none(),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => serializer.collect_seq(items),
            Value::Dict(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_missing() {
        assert!(Value::Null.is_missing());
        assert!(Value::Float(f64::NAN).is_missing());
        assert!(!Value::Float(0.0).is_missing());
        assert!(!Value::String(String::new()).is_missing());
    }

    #[test]
    fn test_is_blank() {
        assert!(Value::String(String::new()).is_blank());
        assert!(Value::Null.is_blank());
        assert!(!Value::String(" ".to_string()).is_blank());
        assert!(!Value::List(vec![]).is_blank());
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Int(1).kind(), "int");
        assert_eq!(Value::List(Vec::new()).kind(), "list");
        assert_eq!(Value::Dict(Vec::new()).kind(), "dict");
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::Float(5.0).to_string(), "5.0");
        assert_eq!(Value::Float(2.25).to_string(), "2.25");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Null.to_string(), "None");
        assert_eq!(Value::from("S-001").to_string(), "S-001");
    }

    #[test]
    fn test_display_nested() {
        let value = Value::List(vec![Value::from("a.txt"), Value::Int(2)]);
        assert_eq!(value.to_string(), "['a.txt', 2]");

        let value = Value::Dict(vec![("temp".to_string(), Value::Float(300.0))]);
        assert_eq!(value.to_string(), "{'temp': 300.0}");
    }

    #[test]
    fn test_serialize() {
        let value = Value::Dict(vec![
            ("a".to_string(), Value::List(vec![Value::Int(1), Value::Float(2.5)])),
            ("b".to_string(), Value::Null),
            ("c".to_string(), Value::Float(f64::NAN)),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"a":[1,2.5],"b":null,"c":null}"#);
    }
}
