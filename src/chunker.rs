use crate::error::ConfigError;
use crate::record::LogRecord;
use itertools::Itertools;
use serde::Serialize;

pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// A group of consecutive records, rendered one record per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogChunk {
    pub index: usize,
    /// First record position (inclusive).
    pub start: usize,
    /// Last record position (exclusive).
    pub end: usize,
    pub text: String,
}

pub fn batch_records(records: &[LogRecord], chunk_size: usize) -> Result<Vec<LogChunk>, ConfigError> {
    if chunk_size == 0 {
        return Err(ConfigError::InvalidChunkSize(chunk_size));
    }
    Ok(records
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, group)| {
            let start = index * chunk_size;
            LogChunk {
                index,
                start,
                end: start + group.len(),
                text: group.iter().join("\n"),
            }
        })
        .collect())
}

pub fn chunk_structured_logs(records: &[LogRecord], chunk_size: usize) -> Result<Vec<String>, ConfigError> {
    Ok(batch_records(records, chunk_size)?.into_iter().map(|c| c.text).collect())
}
