//! This crate is a TF-IDF document index with cosine similarity search,
//! meant as the retrieval step of a retrieval-augmented generation pipeline.
//!
//! ```
//! use tfidf_index::Index;
//!
//! let mut index = Index::new();
//! index.fit([("a", "the cat sat"), ("b", "the dog ran")]).unwrap();
//! index.add("c", "a cat and a dog").unwrap();
//!
//! let hits = index.search("cat", 2).unwrap();
//! assert_eq!(hits.top().unwrap().id, "a");
//! ```

pub mod config;
pub mod error;
pub mod tokenizer;
pub mod utils;
pub mod vectorizer;

/// TF-IDF Index
/// The top-level struct of this crate.
/// It turns a corpus of `(id, text)` documents into sparse TF-IDF vectors
/// and answers top-k cosine similarity queries.
///
/// Internally, it holds:
/// - The vocabulary (term -> stable, densely assigned id)
/// - The document-frequency table
/// - One `DocumentRecord` per document (raw counts, weights, L2 norm)
///
/// `Index<E>` is generic over the TF-IDF calculation engine `E`
/// (default `DefaultTFIDFEngine`).
///
/// # Lifecycle
/// Empty until the first successful `fit`, Fitted afterwards.
/// `add` and `search` need a fitted index; `fit` needs an empty one.
///
/// # Staleness
/// `add` does not re-weight documents stored earlier.
/// `refresh` re-weights them on demand.
pub use vectorizer::index::{DocumentRecord, Index, IndexState};

/// Thread-safe Index handle
/// Wraps an `Index` in `Arc<RwLock<_>>`: writes are exclusive, searches share.
pub use vectorizer::shared::SharedIndex;

/// Corpus statistics
/// `Vocabulary` assigns term ids in first-seen order and never renumbers.
/// `DocumentFrequency` counts, per term id, how many documents contain the term.
/// `Corpus` owns both and registers documents with `observe`.
pub use vectorizer::corpus::{Corpus, DocumentFrequency, TermId, Vocabulary};

/// Term Frequency structure
/// Raw occurrence counts of the terms of one document or query.
pub use vectorizer::term::TermFrequency;

/// TF IDF Calculation Engine Trait
/// Defines how raw counts and document frequencies turn into weights.
/// `DefaultTFIDFEngine` uses raw counts and the smoothed
/// `ln((1 + N) / (1 + df)) + 1` idf.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Search results
/// - `Hits`: ranked result list, best first
/// - `SearchResult`: one document id and its cosine score
pub use vectorizer::evaluate::scoring::{Hits, SearchResult};

/// Tokenizer
/// Lowercase, strip non-word characters, split on whitespace.
pub use tokenizer::{term_frequency, tokenize};

pub use config::IndexConfig;
pub use error::{IndexError, Result};
