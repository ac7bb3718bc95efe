//! xlsxpif command-line tool
//!
//! Converts a sample workbook into a PIF JSON file next to it.
//!
//! ```text
//! xlsxpif samples.xlsx                       # writes samples-pif.json
//! xlsxpif samples.xlsx -o - --sheet Alloys   # writes to stdout
//! ```

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use xlsxpif::{
    CoercionMode, Conversion, ConverterBuilder, IndexColumn, RecordErrorPolicy, SheetSelector,
    XlsxToPifError,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert sample workbooks to PIF JSON records", long_about = None)]
struct Cli {
    /// Workbook to convert (xlsx, xlsm, xlsb, xls, ods)
    workbook: PathBuf,

    /// Output path (`-` for stdout). Defaults to `<workbook>-pif.json`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Column holding the sample identity (default: data row position)
    #[arg(long, value_name = "NAME")]
    index_column: Option<String>,

    /// Sheet to convert; repeat for several (default: all sheets)
    #[arg(long = "sheet", value_name = "NAME")]
    sheets: Vec<String>,

    /// Row holding the column headers, 0-based within the used range
    #[arg(long, default_value_t = 0, value_name = "N")]
    header_row: usize,

    /// Directory referenced files are resolved against
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Skip rows with unrecognized file references instead of aborting
    #[arg(long)]
    skip_bad_records: bool,

    /// Treat unparseable bracketed or comma-separated text as a list of strings
    #[arg(long)]
    split_bare_lists: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok((conversion, destination)) => {
            for skipped in &conversion.skipped {
                eprintln!(
                    "Skipped sheet '{}', row {}: {}",
                    skipped.sheet, skipped.row, skipped.error
                );
            }
            if let Some(path) = destination {
                eprintln!(
                    "Converted {} records: {} -> {}",
                    conversion.records.len(),
                    cli.workbook.display(),
                    path.display()
                );
            }
        }
        Err(e) => {
            handle_error(e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// 変換を実行し、書き込み先（標準出力の場合は`None`）を返す
fn run(cli: &Cli) -> Result<(Conversion, Option<PathBuf>), XlsxToPifError> {
    let mut builder = ConverterBuilder::new()
        .with_header_row(cli.header_row)
        .with_record_error_policy(if cli.skip_bad_records {
            RecordErrorPolicy::Skip
        } else {
            RecordErrorPolicy::Abort
        })
        .with_coercion_mode(if cli.split_bare_lists {
            CoercionMode::SplitBareLists
        } else {
            CoercionMode::Strict
        });

    if let Some(name) = &cli.index_column {
        builder = builder.with_index_column(IndexColumn::Column(name.clone()));
    }
    if !cli.sheets.is_empty() {
        builder = builder.with_sheet_selector(SheetSelector::Names(cli.sheets.clone()));
    }
    if let Some(dir) = &cli.base_dir {
        builder = builder.with_base_dir(dir);
    }

    let converter = builder.build()?;
    let input = File::open(&cli.workbook)?;

    match &cli.output {
        Some(path) if path.as_os_str() == "-" => {
            let conversion = converter.convert_to_writer(input, io::stdout().lock())?;
            Ok((conversion, None))
        }
        output => {
            let path = output
                .clone()
                .unwrap_or_else(|| default_output_path(&cli.workbook));
            let conversion = converter.convert_to_writer(input, File::create(&path)?)?;
            Ok((conversion, Some(path)))
        }
    }
}

/// `samples.xlsx` → `samples-pif.json`
fn default_output_path(workbook: &Path) -> PathBuf {
    let stem = workbook
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    workbook.with_file_name(format!("{}-pif.json", stem))
}

fn handle_error(error: XlsxToPifError) {
    match error {
        XlsxToPifError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        XlsxToPifError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid workbook or may be corrupted.");
        }
        XlsxToPifError::Json(json_err) => {
            eprintln!("JSON Error: {}", json_err);
        }
        XlsxToPifError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
            eprintln!("Please check your sheet selection, index column and base directory.");
        }
        err @ XlsxToPifError::MissingIndex { .. } => {
            eprintln!("Missing Sample Identity: {}", err);
            eprintln!("Use --index-column to name the column holding sample names.");
        }
        err @ XlsxToPifError::UnrecognizedFileValue { .. } => {
            eprintln!("File Reference Error: {}", err);
            eprintln!("Use --skip-bad-records to convert the remaining rows.");
        }
        err @ XlsxToPifError::HeaderPattern { .. } => {
            eprintln!("Header Error: {}", err);
        }
        XlsxToPifError::SecurityViolation(msg) => {
            eprintln!("Security Error: {}", msg);
        }
    }
}
