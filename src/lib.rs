//! xlsxpif - Spreadsheet sample sheets to PIF (Physical Information File) records
//!
//! This crate reads workbooks where each row describes a physical sample and
//! produces one PIF `System` record per row. Ordinary columns become scalar
//! properties with the name and unit parsed from the header (`"Hardness (HV)"`),
//! and three kinds of columns have special meaning:
//!
//! - the index column gives the sample `uid`
//! - `Parent Sample Name` links the record to its parent sample
//! - `FILE: <name>` columns list attached files, hashed with SHA-256 when present locally
//!
//! Text cells holding literals such as `[1, 2]`, `(3, 4)` or `{'T': 300}` are
//! turned into structured values before mapping.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxpif::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     let input = File::open("samples.xlsx")?;
//!     let output = File::create("samples-pif.json")?;
//!
//!     // Write the records as a pretty-printed JSON array
//!     converter.convert_to_writer(input, output)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use xlsxpif::{ConverterBuilder, IndexColumn, RecordErrorPolicy, SheetSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_sheet_selector(SheetSelector::Name("Alloys".to_string()))
//!         .with_index_column(IndexColumn::Column("Sample Name".to_string()))
//!         .with_base_dir("attachments")
//!         .with_record_error_policy(RecordErrorPolicy::Skip)
//!         .build()?;
//!
//!     let conversion = converter.convert_path("samples.xlsx")?;
//!     for record in &conversion.records {
//!         println!("{} -> {:?}", record.uid, record.parent_uid);
//!     }
//!     for skipped in &conversion.skipped {
//!         eprintln!("skipped {} row {}: {}", skipped.sheet, skipped.row, skipped.error);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod coerce;
mod error;
mod files;
mod header;
mod literal;
mod mapper;
mod parser;
mod record;
mod security;
mod types;
mod value;

// 公開API
pub use api::{CoercionMode, IndexColumn, RecordErrorPolicy, SheetSelector};
pub use builder::{Conversion, Converter, ConverterBuilder, SkippedRecord};
pub use error::XlsxToPifError;
pub use files::{sha256_file, FileNames};
pub use header::{parse_header, ParsedHeader};
pub use record::{FileProperty, FileReference, Property, ScalarProperty, System};
pub use value::Value;
