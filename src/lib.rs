pub mod record;
pub mod error;
pub mod parser;
pub mod severity;
pub mod chunker;
pub mod completion;
pub mod analysis;
pub mod retrieval;
pub mod config;
pub mod session;

pub use chunker::{chunk_structured_logs, DEFAULT_CHUNK_SIZE};
pub use parser::{structure_logs, structure_logs_with_opts, ParseOptions};
pub use record::LogRecord;
