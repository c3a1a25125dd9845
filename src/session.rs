use crate::analysis::ChunkAnalyzer;
use crate::chunker::{batch_records, LogChunk};
use crate::completion::Completion;
use crate::config::Config;
use crate::error::{AnalysisError, ConfigError, ServiceError};
use crate::parser::structure_logs_with_opts;
use crate::record::LogRecord;
use crate::retrieval::{Document, Embedder, RetrievalQa, VectorIndex};
use crate::severity::filter_raw_lines;
use tracing::info;

/// Records and chunks produced from one input text. Re-ingesting replaces
/// both; nothing is carried over between calls.
#[derive(Debug, Clone)]
pub struct LogSession {
    pub records: Vec<LogRecord>,
    pub chunks: Vec<LogChunk>,
    /// Documents retrieved per question.
    pub top_k: usize,
}

impl LogSession {
    pub fn ingest(raw_text: &str, cfg: &Config) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let filtered = filter_raw_lines(raw_text, &cfg.level_filter());
        let records = structure_logs_with_opts(&filtered, &cfg.parser);
        let chunks = batch_records(&records, cfg.chunk_size)?;
        info!("structured {} log entries into {} chunks", records.len(), chunks.len());
        Ok(Self { records, chunks, top_k: cfg.top_k })
    }

    pub fn chunk_texts(&self) -> Vec<&str> {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    pub fn documents(&self) -> Vec<Document> {
        Document::from_chunks(&self.chunk_texts())
    }

    pub fn build_index<E: Embedder + ?Sized>(&self, embedder: &E) -> Result<VectorIndex, ServiceError> {
        VectorIndex::build(self.documents(), embedder)
    }

    pub fn qa<'a, E, C>(&self, index: &'a VectorIndex, embedder: &'a E, completion: &'a C) -> RetrievalQa<'a, E, C>
    where
        E: Embedder + ?Sized,
        C: Completion + ?Sized,
    {
        RetrievalQa::new(index, embedder, completion).with_top_k(self.top_k)
    }

    /// Runs one analysis pass of `analyzer` over this session's chunks.
    pub fn analyze<C: Completion>(&self, analyzer: &mut ChunkAnalyzer<C>) -> Result<usize, AnalysisError> {
        Ok(analyzer.analyze(&self.chunk_texts())?.len())
    }
}
