//! Boundary Tests for xlsxpif
//!
//! Empty sheets, oversized cells, date serial boundaries and malformed input.

use rust_xlsxwriter::*;
use std::io::Cursor;
use xlsxpif::{ConverterBuilder, IndexColumn, Property, Value, XlsxToPifError};

// Helper module for generating boundary test fixtures
mod fixtures {
    use super::*;

    /// A workbook with one sheet and no cells
    pub fn generate_empty_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("EmptySheet")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Headers without data rows
    pub fn generate_header_only() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Sample Name")?;
        worksheet.write_string(0, 1, "Mass (g)")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// A cell at the Excel length limit (32,767 characters)
    pub fn generate_long_cell() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Sample Name")?;
        worksheet.write_string(0, 1, "Notes")?;
        worksheet.write_string(1, 0, "S1")?;
        worksheet.write_string(1, 1, &"A".repeat(32_767))?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Date serials around the 1900 leap-year bug and far in the future
    pub fn generate_epoch_boundary_dates() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        worksheet.write_string(0, 0, "Sample Name")?;
        worksheet.write_string(0, 1, "Date")?;

        // Serial 1 = 1900-01-01
        worksheet.write_string(1, 0, "early")?;
        worksheet.write_number_with_format(1, 1, 1.0, &date_format)?;

        // Serial 73050 = 2099-12-31
        worksheet.write_string(2, 0, "late")?;
        worksheet.write_number_with_format(2, 1, 73050.0, &date_format)?;

        // Without a date format the serial stays a number
        worksheet.write_string(3, 0, "plain")?;
        worksheet.write_number(3, 1, 73050.0)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// A date-formatted serial far beyond the representable calendar range
    pub fn generate_huge_date_serial() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        worksheet.write_string(0, 0, "Sample Name")?;
        worksheet.write_string(0, 1, "Date")?;
        worksheet.write_string(1, 0, "S1")?;
        worksheet.write_number_with_format(1, 1, 1.0e12, &date_format)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// A user column literally named "Index" next to the default row index
    pub fn generate_index_named_column() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Index")?;
        worksheet.write_string(0, 1, "Mass (g)")?;
        worksheet.write_string(1, 0, "legacy-7")?;
        worksheet.write_number(1, 1, 1.5)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Deeply nested literal
    pub fn generate_nested_literal(depth: usize) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Sample Name")?;
        worksheet.write_string(0, 1, "Nested")?;
        worksheet.write_string(1, 0, "S1")?;
        worksheet.write_string(1, 1, &format!("{}1{}", "[".repeat(depth), "]".repeat(depth)))?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Corrupted file
    pub fn generate_corrupted_file() -> Vec<u8> {
        b"This is not a valid Excel file content".to_vec()
    }

    /// ZIP header followed by garbage
    pub fn generate_invalid_structure() -> Vec<u8> {
        let mut data = vec![0x50, 0x4B, 0x03, 0x04];
        data.extend_from_slice(b"INVALID_CONTENT");
        data
    }
}

fn by_sample_name() -> IndexColumn {
    IndexColumn::Column("Sample Name".to_string())
}

// TC-B-001: Empty Sheet
#[test]
fn test_empty_sheet() {
    let converter = ConverterBuilder::new().build().unwrap();
    let data = fixtures::generate_empty_sheet().unwrap();

    let conversion = converter.convert(Cursor::new(data)).unwrap();
    assert!(conversion.records.is_empty());

    let data = fixtures::generate_empty_sheet().unwrap();
    let json = converter.convert_to_string(Cursor::new(data)).unwrap();
    assert_eq!(json, "[]");
}

// TC-B-002: Header Only
#[test]
fn test_header_only() {
    let converter = ConverterBuilder::new()
        .with_index_column(by_sample_name())
        .build()
        .unwrap();
    let data = fixtures::generate_header_only().unwrap();

    let conversion = converter.convert(Cursor::new(data)).unwrap();
    assert!(conversion.records.is_empty());
    assert!(conversion.skipped.is_empty());
}

// TC-B-003: Header row beyond the used range
#[test]
fn test_header_row_out_of_range() {
    let converter = ConverterBuilder::new().with_header_row(50).build().unwrap();
    let data = fixtures::generate_header_only().unwrap();

    let conversion = converter.convert(Cursor::new(data)).unwrap();
    assert!(conversion.records.is_empty());
}

// TC-B-004: Very Long Cell Content (32,767 characters)
#[test]
fn test_very_long_cell_content() {
    let converter = ConverterBuilder::new()
        .with_index_column(by_sample_name())
        .build()
        .unwrap();
    let data = fixtures::generate_long_cell().unwrap();

    let records = converter.convert(Cursor::new(data)).unwrap().records;
    let notes = records[0]
        .property("Notes")
        .and_then(Property::as_scalar)
        .unwrap();
    match &notes.value {
        Value::String(s) => assert_eq!(s.len(), 32_767),
        other => panic!("Expected string, got {:?}", other),
    }
}

// TC-B-005: Date at Epoch Boundary
#[test]
fn test_date_epoch_boundary() {
    let converter = ConverterBuilder::new()
        .with_index_column(by_sample_name())
        .build()
        .unwrap();
    let data = fixtures::generate_epoch_boundary_dates().unwrap();

    let records = converter.convert(Cursor::new(data)).unwrap().records;
    let dates: Vec<&Value> = records
        .iter()
        .map(|r| &r.property("Date").and_then(Property::as_scalar).unwrap().value)
        .collect();

    assert_eq!(dates[0], &Value::String("1900-01-01".to_string()));
    assert_eq!(dates[1], &Value::String("2099-12-31".to_string()));
    assert_eq!(dates[2], &Value::Int(73050));
}

// TC-B-006: Date serial outside the calendar range falls back to a number
#[test]
fn test_date_serial_out_of_range() {
    let converter = ConverterBuilder::new()
        .with_index_column(by_sample_name())
        .with_parallel(false)
        .build()
        .unwrap();
    let data = fixtures::generate_huge_date_serial().unwrap();

    let records = converter.convert(Cursor::new(data)).unwrap().records;
    let date = &records[0]
        .property("Date")
        .and_then(Property::as_scalar)
        .unwrap()
        .value;
    assert_eq!(date, &Value::Int(1_000_000_000_000));
}

// TC-B-007: "Index" as a user column
#[test]
fn test_index_named_user_column() {
    let converter = ConverterBuilder::new().build().unwrap();
    let data = fixtures::generate_index_named_column().unwrap();

    let records = converter.convert(Cursor::new(data)).unwrap().records;
    assert_eq!(records[0].uid, "0");

    let names: Vec<&str> = records[0].properties.iter().map(Property::name).collect();
    assert_eq!(names, vec!["Index", "Mass"]);
}

// TC-B-008: Nesting limit of literal cells
#[test]
fn test_nested_literal_depth() {
    let converter = ConverterBuilder::new()
        .with_index_column(by_sample_name())
        .build()
        .unwrap();

    // 浅いネストはリストとして解析される
    let data = fixtures::generate_nested_literal(4).unwrap();
    let records = converter.convert(Cursor::new(data)).unwrap().records;
    let nested = &records[0]
        .property("Nested")
        .and_then(Property::as_scalar)
        .unwrap()
        .value;
    assert!(matches!(nested, Value::List(_)));

    // 深すぎるネストは元の文字列のまま
    let deep = format!("{}1{}", "[".repeat(500), "]".repeat(500));
    let data = fixtures::generate_nested_literal(500).unwrap();
    let records = converter.convert(Cursor::new(data)).unwrap().records;
    let nested = &records[0]
        .property("Nested")
        .and_then(Property::as_scalar)
        .unwrap()
        .value;
    assert_eq!(nested, &Value::String(deep));
}

// Edge case: Corrupted file
#[test]
fn test_corrupted_file() {
    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert_to_string(Cursor::new(fixtures::generate_corrupted_file()));

    match result {
        Err(XlsxToPifError::Parse(_)) | Err(XlsxToPifError::Io(_)) => {}
        other => panic!("Expected Parse or Io error for corrupted file, got {:?}", other),
    }
}

// Edge case: Invalid structure
#[test]
fn test_invalid_structure() {
    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert_to_string(Cursor::new(fixtures::generate_invalid_structure()));

    match result {
        Err(XlsxToPifError::Parse(_)) | Err(XlsxToPifError::Io(_)) => {}
        other => panic!(
            "Expected Parse or Io error for invalid structure, got {:?}",
            other
        ),
    }
}
