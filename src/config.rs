//! Index configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for an [`Index`](crate::Index).
///
/// Deserializable with every field optional, so it can be embedded in a
/// larger application config:
///
/// ```
/// let cfg: tfidf_index::IndexConfig = serde_json::from_str(r#"{ "parallel_threshold": 10000 }"#).unwrap();
/// assert_eq!(cfg.parallel_threshold, Some(10000));
/// assert!(cfg.shrink_vectors);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Score documents with rayon once the index holds at least this many.
    /// `None` keeps search fully sequential.
    pub parallel_threshold: Option<usize>,
    /// Shrink stored sparse vectors to their exact length after vectorization.
    pub shrink_vectors: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: None,
            shrink_vectors: true,
        }
    }
}

impl IndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = Some(threshold);
        self
    }

    pub fn with_shrink_vectors(mut self, shrink: bool) -> Self {
        self.shrink_vectors = shrink;
        self
    }

    /// Whether a search over `doc_num` documents should run in parallel.
    #[inline]
    pub(crate) fn use_parallel(&self, doc_num: usize) -> bool {
        matches!(self.parallel_threshold, Some(threshold) if doc_num >= threshold)
    }
}
