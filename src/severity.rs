use crate::record::LogRecord;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Severity selection applied before or after structuring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LevelFilter {
    #[default]
    All,
    Only(String),
}

impl From<&str> for LevelFilter {
    fn from(s: &str) -> Self {
        let t = s.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("all") {
            LevelFilter::All
        } else {
            LevelFilter::Only(t.to_ascii_uppercase())
        }
    }
}

impl FromStr for LevelFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LevelFilter::from(s))
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFilter::All => f.write_str("All"),
            LevelFilter::Only(level) => f.write_str(level),
        }
    }
}

/// Keeps raw lines mentioning the level token anywhere. Continuation lines of
/// a matching entry are dropped unless they mention it too.
pub fn filter_raw_lines(raw_text: &str, filter: &LevelFilter) -> String {
    match filter {
        LevelFilter::All => raw_text.to_string(),
        LevelFilter::Only(level) => raw_text
            .lines()
            .filter(|line| line.contains(level.as_str()))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn filter_records(records: &[LogRecord], filter: &LevelFilter) -> Vec<LogRecord> {
    match filter {
        LevelFilter::All => records.to_vec(),
        LevelFilter::Only(level) => records
            .iter()
            .filter(|r| r.level.eq_ignore_ascii_case(level))
            .cloned()
            .collect(),
    }
}
