use crate::core::error::{LineError, StoreError};
use crate::models::user::UserRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

const FIELD_SEPARATOR: char = '\t';

/// A line that was present in the store file but could not be turned into a record
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number in the file
    pub line_num: usize,
    pub content: String,
    pub error: LineError,
}

/// Outcome of loading a store file
///
/// Malformed lines do not fail the load; they are collected in `skipped`
/// so the caller can report them.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<UserRecord>,
    pub skipped: Vec<SkippedLine>,
}

/// Parse one `username\tobfuscated_password\tkey` line.
///
/// Trailing empty fields are dropped before counting, so a line ending in a
/// stray tab still parses.
pub fn parse_line(line: &str) -> Result<UserRecord, LineError> {
    let mut fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    while fields.len() > 1 && fields.last() == Some(&"") {
        fields.pop();
    }

    if fields.len() != 3 {
        return Err(LineError::FieldCount { found: fields.len() });
    }

    let key = fields[2]
        .parse::<i32>()
        .map_err(|source| LineError::InvalidKey {
            value: fields[2].to_string(),
            source,
        })?;

    Ok(UserRecord::new(fields[0], fields[1], key))
}

pub fn format_line(record: &UserRecord) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        record.username,
        record.obfuscated_password,
        record.key,
        sep = FIELD_SEPARATOR
    )
}

/// Read every record from the store file at `path`, preserving file order
pub fn load(path: &Path) -> Result<LoadReport, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut report = LoadReport::default();

    for (idx, line_result) in reader.split(b'\n').enumerate() {
        let mut bytes = line_result.map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let (line, parsed) = match String::from_utf8(bytes) {
            Ok(line) => {
                let parsed = parse_line(&line);
                (line, parsed)
            }
            Err(e) => {
                let source = e.utf8_error();
                let lossy = String::from_utf8_lossy(e.as_bytes()).into_owned();
                (lossy, Err(LineError::Encoding { source }))
            }
        };

        match parsed {
            Ok(record) => report.records.push(record),
            Err(e) => {
                warn!(
                    line_num = idx + 1,
                    line = %line,
                    error = %e,
                    "Skipping line with unexpected format"
                );
                report.skipped.push(SkippedLine {
                    line_num: idx + 1,
                    content: line,
                    error: e,
                });
            }
        }
    }

    info!(
        path = %path.display(),
        records = report.records.len(),
        skipped = report.skipped.len(),
        "Store loaded"
    );

    Ok(report)
}

/// Write `records` to `path`, one line per record, replacing any existing content
pub fn save(path: &Path, records: &[UserRecord]) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    for record in records {
        if has_separator(&record.username) || has_separator(&record.obfuscated_password) {
            warn!(
                username = %record.username,
                "Record field contains a tab or line break and will not load back intact"
            );
        }
        writeln!(writer, "{}", format_line(record)).map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    info!(path = %path.display(), records = records.len(), "Store saved");

    Ok(())
}

fn has_separator(field: &str) -> bool {
    field.contains(|c: char| c == FIELD_SEPARATOR || c == '\n' || c == '\r')
}
