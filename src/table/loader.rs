//! # Table Loading
//!
//! The file-loading collaborator: "load file → headers + rows". Only the
//! first sheet of a workbook is read, and its first row is the header.
//!
//! The whole file is read into memory up front so that I/O failures
//! (missing file, permissions) are classified before any decoder runs.

use std::fmt;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use calamine::{Reader, open_workbook_auto_from_rs};
use log::{debug, info, warn};

use super::{Table, TableError};

/// Why a file could not become a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    NotFound,
    NoPermission,
    /// The file is not a format we can read as a table, or has no header row.
    NotATable,
    /// The decoder rejected the file contents.
    Corrupt(String),
    /// Decoded fine, but the rows/headers violate table invariants.
    Malformed(TableError),
    Unknown(String),
}

impl LoadError {
    /// Fixed user-facing text for the activity log.
    pub fn reason(&self) -> &'static str {
        match self {
            LoadError::NotFound => "File Not Found",
            LoadError::NoPermission => "Permission Denied",
            LoadError::Corrupt(_) => "Be careful, I'm fragile!",
            _ => "Couldn't Load",
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound => write!(f, "file not found"),
            LoadError::NoPermission => write!(f, "permission denied"),
            LoadError::NotATable => write!(f, "not a table"),
            LoadError::Corrupt(detail) => write!(f, "corrupt file: {detail}"),
            LoadError::Malformed(err) => write!(f, "malformed table: {err}"),
            LoadError::Unknown(detail) => write!(f, "load failed: {detail}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound,
            io::ErrorKind::PermissionDenied => LoadError::NoPermission,
            io::ErrorKind::IsADirectory => LoadError::NotATable,
            _ => LoadError::Unknown(err.to_string()),
        }
    }
}

impl From<TableError> for LoadError {
    fn from(err: TableError) -> Self {
        LoadError::Malformed(err)
    }
}

/// Anything that can turn a path into a [`Table`]. Runs on the worker side.
pub trait TableSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<Table, LoadError>;
}

/// Supported on-disk formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Delimited(u8),
    Workbook,
}

impl Format {
    fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Format::Delimited(b',')),
            "tsv" => Some(Format::Delimited(b'\t')),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Format::Workbook),
            _ => None,
        }
    }
}

/// Reads spreadsheets and delimited text files from the local filesystem.
#[derive(Debug, Default, Clone)]
pub struct FileSource;

impl TableSource for FileSource {
    fn load(&self, path: &Path) -> Result<Table, LoadError> {
        let bytes = fs::read(path)?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());

        let format = Format::detect(path).ok_or(LoadError::NotATable)?;
        let (headers, rows) = match format {
            Format::Delimited(delimiter) => read_delimited(&bytes, delimiter)?,
            Format::Workbook => read_first_sheet(bytes)?,
        };

        let table = Table::build(headers, rows)?;
        info!(
            "Loaded {} rows x {} columns from {}",
            table.row_count(),
            table.headers().len(),
            path.display()
        );
        Ok(table)
    }
}

type RawTable = (Vec<String>, Vec<Vec<String>>);

fn read_delimited(bytes: &[u8], delimiter: u8) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Corrupt(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(LoadError::NotATable);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LoadError::Corrupt(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

fn read_first_sheet(bytes: Vec<u8>) -> Result<RawTable, LoadError> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| LoadError::Corrupt(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => return Err(LoadError::Corrupt(e.to_string())),
        None => {
            warn!("Workbook has no sheets");
            return Err(LoadError::NotATable);
        }
    };

    let mut rows = range
        .rows()
        .map(|cells| cells.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());
    let headers = rows.next().ok_or(LoadError::NotATable)?;
    Ok((headers, rows.collect()))
}

/// Normalize a user-typed path: trim whitespace and expand a leading `~/`.
pub fn expand_path(input: &str) -> PathBuf {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(trimmed)
}
