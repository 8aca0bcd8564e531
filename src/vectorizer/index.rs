use std::{marker::PhantomData, sync::Arc};

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    config::IndexConfig,
    error::{IndexError, Result},
    tokenizer::term_frequency,
    utils::math::vector::ZeroSpVec,
    vectorizer::{
        corpus::{Corpus, TermId},
        evaluate::scoring::{par_rank, rank, Hits},
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        term::TermFrequency,
    },
};

/// Shared document key. The map key and the record point at the same string.
pub type KeyArc = Arc<str>;

/// Lifecycle of an [`Index`]. The only transition is `Empty -> Fitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// `fit` not called yet; `add` and `search` are rejected.
    Empty,
    /// `fit` succeeded; `fit` is rejected from now on.
    Fitted,
}

/// One indexed document. Immutable once stored, except for an explicit
/// [`Index::refresh`].
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    id: KeyArc,
    /// raw occurrence count per term id
    term_counts: ZeroSpVec<u32>,
    /// tf-idf weight per term id
    vector: ZeroSpVec<f64>,
    norm: f64,
    /// corpus document count the weights were computed against
    weighted_at: u64,
}

impl DocumentRecord {
    pub(crate) fn new(id: impl Into<KeyArc>, term_counts: ZeroSpVec<u32>, vector: ZeroSpVec<f64>, weighted_at: u64) -> Self {
        let norm = vector.norm();
        Self {
            id: id.into(),
            term_counts,
            vector,
            norm,
            weighted_at,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn term_counts(&self) -> &ZeroSpVec<u32> {
        &self.term_counts
    }

    #[inline]
    pub fn vector(&self) -> &ZeroSpVec<f64> {
        &self.vector
    }

    /// precomputed L2 norm of [`vector`](Self::vector)
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Number of documents the corpus held when these weights were computed.
    #[inline]
    pub fn weighted_at(&self) -> u64 {
        self.weighted_at
    }

    fn reweight<E: TFIDFEngine>(&mut self, corpus: &Corpus) {
        self.vector = E::tfidf_vec(&self.term_counts, corpus);
        self.norm = self.vector.norm();
        self.weighted_at = corpus.doc_num();
    }

    fn shrink_to_fit(&mut self) {
        self.term_counts.shrink_to_fit();
        self.vector.shrink_to_fit();
    }
}

/// TF-IDF document index.
///
/// Owns the vocabulary, the document-frequency table and every
/// [`DocumentRecord`]. `E` selects the weighting scheme.
///
/// # Staleness
/// `add` weights the new document with the IDF values current at that
/// moment and does not touch documents stored earlier, so their weights
/// reflect older IDF values. Queries always use the current IDF.
/// Call [`refresh`](Self::refresh) to re-weight everything when that matters.
#[derive(Debug, Clone)]
pub struct Index<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    config: IndexConfig,
    corpus: Corpus,
    documents: IndexMap<KeyArc, DocumentRecord>,
    state: IndexState,
    _marker: PhantomData<fn() -> E>,
}

impl Default for Index<DefaultTFIDFEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<DefaultTFIDFEngine> {
    /// Create an empty index with the default engine and config
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }
}

impl<E> Index<E>
where
    E: TFIDFEngine,
{
    /// Create an empty index
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            config,
            corpus: Corpus::new(),
            documents: IndexMap::new(),
            state: IndexState::Empty,
            _marker: PhantomData,
        }
    }

    /// Build the index from a whole corpus of `(id, text)` pairs.
    ///
    /// Pass 1 observes every document to fill the vocabulary and document
    /// frequencies; pass 2 weights every document against the complete
    /// statistics. Nothing is committed unless both passes run, so an error
    /// leaves the index empty.
    ///
    /// # Errors
    /// * `AlreadyFitted` - the index is already fitted
    /// * `DuplicateDocumentId` - an id appears more than once in `corpus`
    pub fn fit<I, K, T>(&mut self, corpus: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: AsRef<str>,
    {
        if self.state == IndexState::Fitted {
            debug!("fit rejected: index already fitted");
            return Err(IndexError::AlreadyFitted);
        }

        let mut staged: IndexMap<KeyArc, TermFrequency> = IndexMap::new();
        for (id, text) in corpus {
            let id: String = id.into();
            if staged.contains_key(id.as_str()) {
                debug!(id = %id, "fit rejected: duplicate document id");
                return Err(IndexError::DuplicateDocumentId(id));
            }
            staged.insert(KeyArc::from(id), term_frequency(text.as_ref()));
        }

        // pass 1: vocabulary + document frequency
        let mut stats = Corpus::new();
        let observed: Vec<(KeyArc, ZeroSpVec<u32>)> = staged
            .into_iter()
            .map(|(id, freq)| {
                let counts = stats.observe(&freq);
                (id, counts)
            })
            .collect();

        // pass 2: weights against the complete statistics
        let doc_num = stats.doc_num();
        let mut documents = IndexMap::with_capacity(observed.len());
        for (id, counts) in observed {
            let vector = E::tfidf_vec(&counts, &stats);
            let mut record = DocumentRecord::new(Arc::clone(&id), counts, vector, doc_num);
            if self.config.shrink_vectors {
                record.shrink_to_fit();
            }
            documents.insert(id, record);
        }

        self.corpus = stats;
        self.documents = documents;
        self.state = IndexState::Fitted;
        debug!(
            documents = self.documents.len(),
            vocabulary = self.corpus.vocabulary().len(),
            "index fitted"
        );
        Ok(())
    }

    /// Add one document to a fitted index.
    ///
    /// Extends the vocabulary and document frequencies with this document,
    /// then weights it with the updated statistics. Previously stored
    /// documents keep their weights.
    ///
    /// # Errors
    /// * `NotFitted` - `fit` has not been called
    /// * `DuplicateDocumentId` - `id` is already indexed
    pub fn add(&mut self, id: impl Into<String>, text: &str) -> Result<()> {
        self.ensure_fitted("add")?;
        let id: String = id.into();
        if self.documents.contains_key(id.as_str()) {
            debug!(id = %id, "add rejected: duplicate document id");
            return Err(IndexError::DuplicateDocumentId(id));
        }

        let freq = term_frequency(text);
        let counts = self.corpus.observe(&freq);
        let vector = E::tfidf_vec(&counts, &self.corpus);
        let key = KeyArc::from(id);
        let mut record = DocumentRecord::new(Arc::clone(&key), counts, vector, self.corpus.doc_num());
        if self.config.shrink_vectors {
            record.shrink_to_fit();
        }
        self.documents.insert(key, record);
        debug!(
            documents = self.documents.len(),
            vocabulary = self.corpus.vocabulary().len(),
            "document added"
        );
        Ok(())
    }

    /// Find the `k` documents most similar to `query`.
    ///
    /// The query is weighted with the current statistics; terms outside the
    /// vocabulary are ignored. Returns `min(k, size())` hits ordered by score
    /// descending, ties by ascending id. A query with no known terms scores
    /// every document 0.0.
    ///
    /// # Errors
    /// * `NotFitted` - `fit` has not been called
    /// * `InvalidK` - `k == 0`
    pub fn search(&self, query: &str, k: usize) -> Result<Hits> {
        self.ensure_fitted("search")?;
        if k == 0 {
            debug!("search rejected: k == 0");
            return Err(IndexError::InvalidK);
        }

        let query_vec = self.vectorize_query(query);
        let hits = if self.config.use_parallel(self.documents.len()) {
            par_rank(&query_vec, self.documents.par_values(), k)
        } else {
            rank(&query_vec, self.documents.values(), k)
        };
        trace!(
            query_terms = query_vec.nnz(),
            hits = hits.len(),
            "search finished"
        );
        Ok(hits)
    }

    /// The weighted query vector `search` would use for `query`.
    pub fn vectorize_query(&self, query: &str) -> ZeroSpVec<f64> {
        let counts = self.corpus.lookup(&term_frequency(query));
        E::tfidf_vec(&counts, &self.corpus)
    }

    /// Re-weight every stale document against the current statistics.
    ///
    /// O(total stored terms). Returns how many documents were re-weighted.
    pub fn refresh(&mut self) -> usize {
        let corpus = &self.corpus;
        let doc_num = corpus.doc_num();
        let refreshed = if self.config.use_parallel(self.documents.len()) {
            self.documents
                .par_values_mut()
                .filter(|record| record.weighted_at != doc_num)
                .map(|record| record.reweight::<E>(corpus))
                .count()
        } else {
            self.documents
                .values_mut()
                .filter(|record| record.weighted_at != doc_num)
                .map(|record| record.reweight::<E>(corpus))
                .count()
        };
        debug!(refreshed = refreshed, "stale documents re-weighted");
        refreshed
    }

    /// Number of documents whose weights predate the latest `add`.
    pub fn stale_len(&self) -> usize {
        let doc_num = self.corpus.doc_num();
        self.documents
            .values()
            .filter(|record| record.weighted_at != doc_num)
            .count()
    }

    /// Number of indexed documents
    #[inline]
    pub fn size(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn state(&self) -> IndexState {
        self.state
    }

    #[inline]
    pub fn is_fitted(&self) -> bool {
        self.state == IndexState::Fitted
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    #[inline]
    pub fn document(&self, id: &str) -> Option<&DocumentRecord> {
        self.documents.get(id)
    }

    /// Stored documents in insertion order
    pub fn documents(&self) -> impl ExactSizeIterator<Item = &DocumentRecord> {
        self.documents.values()
    }

    #[inline]
    pub fn vocabulary_len(&self) -> usize {
        self.corpus.vocabulary().len()
    }

    #[inline]
    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.corpus.vocabulary().get(term)
    }

    /// Number of documents containing `term`, `None` if it is not in the vocabulary
    pub fn document_frequency(&self, term: &str) -> Option<u64> {
        self.term_id(term).map(|id| self.corpus.doc_freq().get(id))
    }

    /// Current IDF of `term`, `None` if it is not in the vocabulary
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.document_frequency(term)
            .map(|df| E::idf(self.corpus.doc_num(), df))
    }

    #[inline]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    #[inline]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    fn ensure_fitted(&self, op: &str) -> Result<()> {
        if self.state == IndexState::Empty {
            debug!(op = op, "rejected: index not fitted");
            return Err(IndexError::NotFitted);
        }
        Ok(())
    }
}
