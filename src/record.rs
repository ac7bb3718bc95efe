//! Record Model Module
//!
//! 1行に対応する出力レコード（PIF System）とそのプロパティを定義するモジュール。
//! シリアライズ結果はPIF形式のJSON（camelCaseキー）になります。

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::value::Value;

const SYSTEM_CATEGORY: &str = "system";

/// 1サンプルを表す出力レコード
///
/// PIF形式では親サンプルは`subSystems`に識別子のみのSystemとして出力されます。
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    /// サンプル識別子
    pub uid: String,

    /// 親サンプルの識別子
    pub parent_uid: Option<String>,

    /// プロパティ（列順）
    pub properties: Vec<Property>,
}

impl System {
    pub fn new(uid: String, parent_uid: Option<String>, properties: Vec<Property>) -> Self {
        Self {
            uid,
            parent_uid,
            properties,
        }
    }

    /// 名前でプロパティを検索
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }
}

/// 識別子のみのSystem（`subSystems`の要素）
struct SystemRef<'a>(&'a str);

impl Serialize for SystemRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("System", 2)?;
        state.serialize_field("category", SYSTEM_CATEGORY)?;
        state.serialize_field("uid", self.0)?;
        state.end()
    }
}

impl Serialize for System {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.parent_uid.is_some() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("System", len)?;
        state.serialize_field("category", SYSTEM_CATEGORY)?;
        state.serialize_field("uid", &self.uid)?;
        if let Some(parent) = &self.parent_uid {
            state.serialize_field("subSystems", &[SystemRef(parent)])?;
        }
        state.serialize_field("properties", &self.properties)?;
        state.end()
    }
}

/// プロパティ（スカラーまたはファイル参照）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Property {
    Scalar(ScalarProperty),
    File(FileProperty),
}

impl Property {
    /// プロパティ名
    pub fn name(&self) -> &str {
        match self {
            Property::Scalar(p) => &p.name,
            Property::File(p) => &p.name,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarProperty> {
        match self {
            Property::Scalar(p) => Some(p),
            Property::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileProperty> {
        match self {
            Property::File(p) => Some(p),
            Property::Scalar(_) => None,
        }
    }
}

/// 通常列から生成されるスカラープロパティ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarProperty {
    pub name: String,
    #[serde(rename = "scalars")]
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

/// `FILE:`列から生成されるファイルプロパティ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileProperty {
    pub name: String,
    /// ファイル参照（空の場合も常に出力）
    pub files: Vec<FileReference>,
}

/// ファイル参照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    /// セルに書かれたファイル名
    pub relative_path: String,
    /// 内容のSHA-256（16進小文字）。ファイルがローカルにない場合は`None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}
