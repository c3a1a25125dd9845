use crate::completion::Completion;
use crate::error::ServiceError;
use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_TOP_K: usize = 3;

/// A chunk wrapped for retrieval; `content` is the chunk text unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: usize,
    pub content: String,
}

impl Document {
    pub fn from_chunks<S: AsRef<str>>(chunks: &[S]) -> Vec<Document> {
        chunks
            .iter()
            .enumerate()
            .map(|(id, c)| Document { id, content: c.as_ref().to_string() })
            .collect()
    }
}

/// Maps text to a fixed-length vector.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError>;
}

impl<F> Embedder for F
where
    F: Fn(&str) -> Result<Vec<f32>, ServiceError> + Send + Sync,
{
    fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError> {
        self(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub document: Document,
    pub score: f32,
}

/// Brute-force cosine index over an in-memory document set.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    documents: Vec<Document>,
    vectors: Vec<Vec<f32>>,
    dimension: usize,
}

impl VectorIndex {
    /// Embeds every document. Always a full rebuild; there is no incremental add.
    pub fn build<E: Embedder + ?Sized>(documents: Vec<Document>, embedder: &E) -> Result<Self, ServiceError> {
        let vectors: Vec<Vec<f32>> = documents
            .par_iter()
            .map(|d| embedder.embed(&d.content))
            .collect::<Result<Vec<_>, ServiceError>>()?;

        let dimension = vectors.first().map(|v| v.len()).unwrap_or(0);
        if let Some((id, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dimension) {
            return Err(ServiceError::MalformedResponse(format!(
                "embedding for document {id} has {} dimensions, expected {dimension}",
                v.len()
            )));
        }
        debug!(documents = documents.len(), dimension, "built vector index");
        Ok(Self { documents, vectors, dimension })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn search<E: Embedder + ?Sized>(&self, query: &str, k: usize, embedder: &E) -> Result<Vec<Hit>, ServiceError> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let q = embedder.embed(query)?;
        self.search_by_vector(&q, k)
    }

    /// Top `k` documents by cosine similarity, best first. Equal scores keep
    /// document order.
    pub fn search_by_vector(&self, query: &[f32], k: usize) -> Result<Vec<Hit>, ServiceError> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(ServiceError::MalformedResponse(format!(
                "query embedding has {} dimensions, expected {}",
                query.len(),
                self.dimension
            )));
        }
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(query, v)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| Hit { document: self.documents[i].clone(), score })
            .collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let score = dot / (na * nb);
    if score.is_finite() { score } else { 0.0 }
}

pub fn qa_prompt(sources: &[Hit], question: &str) -> String {
    let context = sources.iter().map(|h| h.document.content.as_str()).join("\n\n");
    format!(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n\
         {context}\n\n\
         Question: {question}\n\
         Helpful Answer:"
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<Hit>,
}

/// Question answering over a built index: retrieve top-k chunks, then let the
/// completion service answer from them.
pub struct RetrievalQa<'a, E: ?Sized, C: ?Sized> {
    index: &'a VectorIndex,
    embedder: &'a E,
    completion: &'a C,
    top_k: usize,
}

impl<'a, E: Embedder + ?Sized, C: Completion + ?Sized> RetrievalQa<'a, E, C> {
    pub fn new(index: &'a VectorIndex, embedder: &'a E, completion: &'a C) -> Self {
        Self { index, embedder, completion, top_k: DEFAULT_TOP_K }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn ask(&self, question: &str) -> Result<Answer, ServiceError> {
        let sources = self.index.search(question, self.top_k, self.embedder)?;
        debug!(retrieved = sources.len(), top_k = self.top_k, "answering question");
        let text = self.completion.complete(&qa_prompt(&sources, question))?;
        Ok(Answer { text, sources })
    }
}
