//! Types Module
//!
//! ワークブックから読み込んだ生のセル値を定義するモジュール。

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// セルの値を表す列挙型（型変換前）
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    /// 整数
    Int(i64),

    /// 浮動小数点数
    Float(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// 空セル（エラーセルもこれに含める）
    Empty,
}

impl CellValue {
    /// calamineのセルデータから変換
    ///
    /// 整数値を持つ浮動小数点数は`Int`に正規化します（Excelはすべての数値を
    /// 浮動小数点数として保存するため）。
    pub fn from_data(data: &calamine::Data) -> Self {
        use calamine::Data;

        match data {
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => Self::from_float(*f),
            Data::String(s) => CellValue::String(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => match serial_to_datetime(dt.as_f64()) {
                Some(datetime) => CellValue::String(format_datetime(datetime)),
                None => Self::from_float(dt.as_f64()),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
            Data::Error(e) => {
                tracing::debug!("error cell {:?} treated as empty", e);
                CellValue::Empty
            }
            Data::Empty => CellValue::Empty,
        }
    }

    fn from_float(f: f64) -> Self {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
            CellValue::Int(f as i64)
        } else {
            CellValue::Float(f)
        }
    }

    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// ヘッダー用の文字列表現
    pub fn as_header(&self) -> Option<String> {
        match self {
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) if f.is_nan() => None,
            CellValue::Float(f) => Some(f.to_string()),
            CellValue::String(s) if s.is_empty() => None,
            CellValue::String(s) => Some(s.clone()),
            CellValue::Bool(true) => Some("True".to_string()),
            CellValue::Bool(false) => Some("False".to_string()),
            CellValue::Empty => None,
        }
    }
}

/// Excelのシリアル日付値（1900年システム）を日時に変換
///
/// 1899年12月30日起算。シリアル値60未満の範囲は、Excelの1900年うるう年バグにより
/// 1日ずれるため補正します。
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.floor() as i64;
    let days = if days < 60 { days + 1 } else { days };
    let seconds = ((serial - serial.floor()) * 86_400.0).round() as i64;

    epoch
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}

fn format_datetime(datetime: NaiveDateTime) -> String {
    if datetime.time() == chrono::NaiveTime::MIN {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}
