use crate::record::{LogRecord, UNKNOWN_LEVEL};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

// `2024-01-01 10:00:00,123 [ERROR] message`; the sub-second part is not kept
// and the level token may be missing. A bracketed level may end the line, a
// bare one must be followed by a message.
static RE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})(?:,\d+)?\s+(?:\[(\w+)\](?:\s+|$)|(\w+)\s+)?(.*)$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Recognize single-line JSON objects carrying `timestamp`, `level` and `message`.
    pub accept_json: bool,
    /// Keep lines seen before any header as `UNKNOWN` records instead of dropping them.
    pub keep_unmatched_as_unknown: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { accept_json: true, keep_unmatched_as_unknown: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Json(LogRecord),
    Header(LogRecord),
    Continuation(&'a str),
}

pub fn recognize_json(line: &str) -> Option<LogRecord> {
    let t = line.trim();
    // serde would also accept a 3-element array as the struct's sequence form
    if !t.starts_with('{') {
        return None;
    }
    serde_json::from_str::<LogRecord>(t).ok()
}

pub fn recognize_header(line: &str) -> Option<LogRecord> {
    let caps = RE_HEADER.captures(line)?;
    let level = caps
        .get(2)
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
        .unwrap_or(UNKNOWN_LEVEL);
    Some(LogRecord::new(&caps[1], level, &caps[4]))
}

/// Tries each recognizer in priority order: blank, JSON, header, continuation.
pub fn classify_line<'a>(line: &'a str, opts: &ParseOptions) -> LineKind<'a> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if opts.accept_json {
        if let Some(rec) = recognize_json(line) {
            return LineKind::Json(rec);
        }
    }
    if let Some(rec) = recognize_header(line) {
        return LineKind::Header(rec);
    }
    LineKind::Continuation(line)
}

pub fn structure_logs(raw_text: &str) -> Vec<LogRecord> {
    structure_logs_with_opts(raw_text, &ParseOptions::default())
}

/// Single pass over the physical lines of `raw_text`. Never fails: input that
/// matches no known shape either extends the open record or becomes an
/// `UNKNOWN` record.
pub fn structure_logs_with_opts(raw_text: &str, opts: &ParseOptions) -> Vec<LogRecord> {
    let mut out = Vec::new();
    let mut current: Option<LogRecord> = None;
    let mut line_count = 0usize;
    let mut dropped = 0usize;

    for (idx, line) in raw_text.lines().enumerate() {
        line_count += 1;
        match classify_line(line, opts) {
            LineKind::Blank => {}
            LineKind::Json(rec) | LineKind::Header(rec) => {
                finalize(&mut out, current.replace(rec));
            }
            LineKind::Continuation(text) => match current.as_mut() {
                Some(rec) => rec.append_line(text),
                None if opts.keep_unmatched_as_unknown => current = Some(LogRecord::unknown(text)),
                None => {
                    dropped += 1;
                    trace!(line_number = idx + 1, "dropping line outside any record");
                }
            },
        }
    }
    finalize(&mut out, current.take());

    debug!(lines = line_count, records = out.len(), dropped, "structured log text");
    out
}

fn finalize(out: &mut Vec<LogRecord>, rec: Option<LogRecord>) {
    if let Some(rec) = rec {
        if !rec.message.is_empty() {
            out.push(rec);
        }
    }
}
