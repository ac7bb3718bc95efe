//! Parser Module
//!
//! calamineを使用したワークブックの読み込みと、シートの表への変換。

mod table;
mod workbook;

pub(crate) use table::SheetTable;
pub(crate) use workbook::WorkbookParser;
