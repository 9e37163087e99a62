//! Reads an already-fetched event file from disk.
//!
//! Two layouts are accepted: a single JSON array of events (what the provider's
//! events endpoint returns once the pages are concatenated) or one event per
//! line. Records that fail to decode are kept as errors so the session can
//! report and skip them; input order is preserved either way.

use std::fs::File;
use std::path::{Path, PathBuf};

use memchr::memchr_iter;
use memmap2::Mmap;
use rayon::prelude::*;
use thiserror::Error;

use super::RawCombatEvent;

/// One decoded (or undecodable) record of an event file.
#[derive(Debug)]
pub struct ParsedRecord {
    /// 1-based line for line-delimited files, 1-based element index for arrays
    pub line_number: usize,
    pub event: Result<RawCombatEvent, String>,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path:?} is not a JSON array of events: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn read_event_file<P: AsRef<Path>>(path: P) -> Result<Vec<ParsedRecord>, ReadError> {
    let path = path.as_ref();
    let io_err = |source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    if file.metadata().map_err(io_err)?.len() == 0 {
        return Ok(Vec::new());
    }
    // SAFETY: the file is only read, and the mapping is dropped before returning
    let mmap = unsafe { Mmap::map(&file).map_err(io_err)? };

    let records = parse_events(mmap.as_ref()).map_err(|source| ReadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = ?path, records = records.len(), "Read event file");
    Ok(records)
}

/// Parse an in-memory event buffer in either accepted layout.
pub fn parse_events(bytes: &[u8]) -> Result<Vec<ParsedRecord>, serde_json::Error> {
    let first = bytes.iter().position(|b| !b.is_ascii_whitespace());
    match first.map(|i| bytes[i]) {
        None => Ok(Vec::new()),
        Some(b'[') => parse_array(bytes),
        Some(_) => Ok(parse_lines(bytes)),
    }
}

fn parse_array(bytes: &[u8]) -> Result<Vec<ParsedRecord>, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
    Ok(values
        .into_par_iter()
        .enumerate()
        .map(|(idx, value)| ParsedRecord {
            line_number: idx + 1,
            event: serde_json::from_value(value).map_err(|e| e.to_string()),
        })
        .collect())
}

fn parse_lines(bytes: &[u8]) -> Vec<ParsedRecord> {
    // Find all line boundaries
    let mut line_ranges: Vec<(usize, usize, usize)> = Vec::new();
    let mut start = 0;
    let mut line_number = 0;
    for end in memchr_iter(b'\n', bytes) {
        line_number += 1;
        if end > start {
            line_ranges.push((line_number, start, end));
        }
        start = end + 1;
    }
    if start < bytes.len() {
        line_ranges.push((line_number + 1, start, bytes.len()));
    }

    line_ranges
        .par_iter()
        .filter_map(|&(line_number, start, end)| {
            let line = bytes[start..end].trim_ascii();
            if line.is_empty() {
                return None;
            }
            Some(ParsedRecord {
                line_number,
                event: serde_json::from_slice(line).map_err(|e| e.to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_log::EventType;

    #[test]
    fn test_parse_lines_keeps_order_and_errors() {
        let input = b"{\"timestamp\": 1, \"type\": \"cast\"}\n\nnot json\r\n{\"timestamp\": 3, \"type\": \"damage\"}";
        let records = parse_events(input).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].line_number, 1);
        assert_eq!(records[0].event.as_ref().unwrap().timestamp, Some(1));
        assert_eq!(records[1].line_number, 3);
        assert!(records[1].event.is_err());
        assert_eq!(records[2].line_number, 4);
        assert_eq!(
            records[2].event.as_ref().unwrap().event_type,
            Some(EventType::Damage)
        );
    }

    #[test]
    fn test_parse_array() {
        let input = br#"  [{"timestamp": 1, "type": "cast"}, {"timestamp": "late"}, {"timestamp": 2}]"#;
        let records = parse_events(input).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].event.is_ok());
        assert!(records[1].event.is_err());
        assert_eq!(records[2].line_number, 3);
    }

    #[test]
    fn test_broken_array_is_an_error() {
        assert!(parse_events(b"[{\"timestamp\": 1},").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_events(b"  \n ").unwrap().is_empty());
    }
}
