use crate::completion::Completion;
use crate::error::{AnalysisError, ServiceError};
use itertools::Itertools;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

pub fn analysis_prompt(chunk: &str) -> String {
    format!(
        "You are a professional log analyst. Analyze the following logs:\n\n\
         {chunk}\n\n\
         Return:\n\
         1. Summary\n\
         2. Errors\n\
         3. Root cause\n\
         4. Suggested Fix\n"
    )
}

pub fn roll_up_prompt<S: AsRef<str>>(insights: &[S]) -> String {
    let combined = insights.iter().map(|s| s.as_ref()).join("\n\n");
    format!("Summarize all these chunk-wise log analyses:\n{combined}")
}

/// Runs the per-chunk analysis pass and keeps its results for the roll-up.
///
/// A failed pass leaves the results obtained before the failing chunk in
/// place; a new pass starts from scratch.
pub struct ChunkAnalyzer<C> {
    completion: C,
    insights: Vec<String>,
}

impl<C: Completion> ChunkAnalyzer<C> {
    pub fn new(completion: C) -> Self {
        Self { completion, insights: Vec::new() }
    }

    /// Results of the latest pass, in chunk order.
    pub fn insights(&self) -> &[String] {
        &self.insights
    }

    pub fn into_insights(self) -> Vec<String> {
        self.insights
    }

    /// One completion call at a time, in chunk order. Stops at the first failure.
    pub fn analyze<S: AsRef<str>>(&mut self, chunks: &[S]) -> Result<&[String], AnalysisError> {
        self.insights.clear();
        for (index, chunk) in chunks.iter().enumerate() {
            debug!(chunk = index, total = chunks.len(), "analyzing chunk");
            match self.completion.complete(&analysis_prompt(chunk.as_ref())) {
                Ok(reply) => self.insights.push(reply),
                Err(source) => return Err(self.fail(index, source)),
            }
        }
        info!(chunks = chunks.len(), "chunk analysis completed");
        Ok(&self.insights)
    }

    /// Issues chunk calls on the rayon pool. Once a chunk fails, chunks after
    /// it are no longer sent; chunks before it still run so the kept results
    /// stay a gap-free prefix. Results are reassembled in chunk order, so both
    /// the stored results and the reported failure match `analyze`.
    pub fn analyze_parallel<S: AsRef<str> + Sync>(&mut self, chunks: &[S]) -> Result<&[String], AnalysisError> {
        self.insights.clear();
        let completion = &self.completion;
        let first_failure = AtomicUsize::new(usize::MAX);
        // None marks a chunk skipped because an earlier one already failed.
        let results: Vec<Option<Result<String, ServiceError>>> = chunks
            .par_iter()
            .enumerate()
            .map(|(index, chunk)| {
                if index > first_failure.load(Ordering::SeqCst) {
                    return None;
                }
                debug!(chunk = index, total = chunks.len(), "analyzing chunk");
                let result = completion.complete(&analysis_prompt(chunk.as_ref()));
                if result.is_err() {
                    first_failure.fetch_min(index, Ordering::SeqCst);
                }
                Some(result)
            })
            .collect();

        // A skipped chunk always sits after a failed one, so the loop returns
        // before it could leave a gap.
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Some(Ok(reply)) => self.insights.push(reply),
                Some(Err(source)) => return Err(self.fail(index, source)),
                None => {}
            }
        }
        info!(chunks = chunks.len(), "chunk analysis completed");
        Ok(&self.insights)
    }

    /// Folds every stored chunk result into one summary with a second call.
    pub fn roll_up(&self) -> Result<String, AnalysisError> {
        if self.insights.is_empty() {
            return Err(AnalysisError::NoInsights);
        }
        let summary = self
            .completion
            .complete(&roll_up_prompt(&self.insights))
            .map_err(AnalysisError::RollUp)?;
        info!(chunks = self.insights.len(), "roll-up completed");
        Ok(summary)
    }

    fn fail(&self, index: usize, source: ServiceError) -> AnalysisError {
        warn!(chunk = index, kept = self.insights.len(), error = %source, "chunk analysis failed");
        AnalysisError::Chunk { index, source }
    }
}
