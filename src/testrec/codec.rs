//! # Database File Format
//!
//! A database is a UTF-8 text file with one header line and one row per record:
//!
//! ```text
//! TestID,SystemName,TestType,TestResult,Active
//! 1,API Gateway,Smoke,Passed,1
//! 2,Billing,Regression,Pending,0
//! ```
//!
//! There is no quoting: field values never contain the delimiter, which the
//! validation rules already guarantee for anything written through the
//! operations layer.
//!
//! ## Decoding Is Forgiving
//!
//! Only a missing or wrong header is fatal. Everything else degrades row by row
//! so one damaged line never makes the rest of the file unreadable:
//!
//! - First field not a positive integer: the row is skipped.
//! - Duplicate id: the later row is skipped with a warning.
//! - Name longer than [`MAX_FIELD_LEN`]: truncated, with a warning.
//! - Unknown result token: becomes `Pending`, with a warning.
//! - Non-numeric active flag: becomes `false` (deleted), with a warning.
//!
//! Decoding does not apply the name validation rules. A two-letter system name
//! in the file loads fine; only new input is held to the stricter rules.

use crate::model::{Record, TestResult, MAX_FIELD_LEN};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;

pub const HEADER: &str = "TestID,SystemName,TestType,TestResult,Active";
pub const DELIMITER: char = ',';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("file is empty, expected header '{}'", HEADER)]
    MissingHeader,

    #[error("expected header '{}', found '{}'", HEADER, .0)]
    InvalidHeader(String),
}

/// A row that loaded, but not exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    UnknownResult { line: usize, id: u32, token: String },
    InvalidActive { line: usize, id: u32, value: String },
    Truncated { line: usize, id: u32, field: &'static str },
    DuplicateId { line: usize, id: u32 },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::UnknownResult { line, id, token } => write!(
                f,
                "line {}: record {} has unknown result '{}', using Pending",
                line, id, token
            ),
            DecodeWarning::InvalidActive { line, id, value } => write!(
                f,
                "line {}: record {} has invalid active flag '{}', marking it deleted",
                line, id, value
            ),
            DecodeWarning::Truncated { line, id, field } => write!(
                f,
                "line {}: record {} {} truncated to {} characters",
                line, id, field, MAX_FIELD_LEN
            ),
            DecodeWarning::DuplicateId { line, id } => {
                write!(f, "line {}: duplicate record id {}, row ignored", line, id)
            }
        }
    }
}

/// Output of [`decode`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub records: Vec<Record>,
    pub warnings: Vec<DecodeWarning>,
    /// Rows dropped because their id was unreadable.
    pub skipped: usize,
}

/// Checks that `text` starts with the expected header line.
pub fn check_header(text: &str) -> Result<(), FormatError> {
    let first = text
        .lines()
        .next()
        .ok_or(FormatError::MissingHeader)?;
    let first = first.trim_end_matches('\r');
    if first == HEADER {
        Ok(())
    } else {
        Err(FormatError::InvalidHeader(first.to_string()))
    }
}

pub fn decode(text: &str) -> Result<Decoded, FormatError> {
    check_header(text)?;

    let mut decoded = Decoded::default();
    let mut seen = HashSet::new();

    // Line numbers are 1-based and the header is line 1.
    for (line_no, raw) in text.lines().enumerate().skip(1).map(|(i, l)| (i + 1, l)) {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        match decode_row(line, line_no, &mut decoded.warnings) {
            Some(record) => {
                if !seen.insert(record.id) {
                    decoded.warnings.push(DecodeWarning::DuplicateId {
                        line: line_no,
                        id: record.id,
                    });
                    continue;
                }
                decoded.records.push(record);
            }
            None => {
                debug!(line = line_no, "skipping row without a valid id");
                decoded.skipped += 1;
            }
        }
    }

    Ok(decoded)
}

fn decode_row(line: &str, line_no: usize, warnings: &mut Vec<DecodeWarning>) -> Option<Record> {
    let mut fields = line.split(DELIMITER).map(str::trim);

    let id = fields.next()?.parse::<u32>().ok().filter(|&id| id > 0)?;

    let mut name_field = |value: Option<&str>, field: &'static str| {
        let value = value.unwrap_or_default();
        if value.chars().count() > MAX_FIELD_LEN {
            warnings.push(DecodeWarning::Truncated {
                line: line_no,
                id,
                field,
            });
            value.chars().take(MAX_FIELD_LEN).collect()
        } else {
            value.to_string()
        }
    };
    let system_name = name_field(fields.next(), "system name");
    let test_type = name_field(fields.next(), "test type");

    let token = fields.next().unwrap_or_default();
    let result = token.parse::<TestResult>().unwrap_or_else(|_| {
        warnings.push(DecodeWarning::UnknownResult {
            line: line_no,
            id,
            token: token.to_string(),
        });
        TestResult::Pending
    });

    let flag = fields.next().unwrap_or_default();
    let active = match flag.parse::<i64>() {
        Ok(n) => n != 0,
        Err(_) => {
            warnings.push(DecodeWarning::InvalidActive {
                line: line_no,
                id,
                value: flag.to_string(),
            });
            false
        }
    };

    Some(Record {
        id,
        system_name,
        test_type,
        result,
        active,
    })
}

pub fn encode(records: &[Record]) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + records.len() * 48);
    out.push_str(HEADER);
    out.push('\n');
    for record in records {
        out.push_str(&encode_row(record));
        out.push('\n');
    }
    out
}

fn encode_row(record: &Record) -> String {
    format!(
        "{}{d}{}{d}{}{d}{}{d}{}",
        record.id,
        record.system_name,
        record.test_type,
        record.result.as_str(),
        u8::from(record.active),
        d = DELIMITER
    )
}
