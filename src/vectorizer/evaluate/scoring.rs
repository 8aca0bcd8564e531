use std::{cmp::{Ordering, Reverse}, collections::BinaryHeap, fmt::{self, Debug, Display}};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{utils::math::vector::ZeroSpVec, vectorizer::index::DocumentRecord};

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// external document id
    pub id: String,
    /// cosine similarity in `[0.0, 1.0]`
    pub score: f64,
}

/// Structure to store search results, best first.
///
/// Ordered by score descending; equal scores are ordered by ascending id.
#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hits {
    pub list: Vec<SearchResult>,
}

impl Hits {
    pub fn new(list: Vec<SearchResult>) -> Self {
        Hits { list }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.list.iter()
    }

    /// Best hit, if any
    #[inline]
    pub fn top(&self) -> Option<&SearchResult> {
        self.list.first()
    }

    /// Document ids in rank order
    pub fn ids(&self) -> Vec<&str> {
        self.list.iter().map(|hit| hit.id.as_str()).collect()
    }

    /// Score of a given document, if it made the list
    pub fn score_of(&self, id: &str) -> Option<f64> {
        self.list.iter().find(|hit| hit.id == id).map(|hit| hit.score)
    }

    pub fn into_vec(self) -> Vec<SearchResult> {
        self.list
    }
}

impl IntoIterator for Hits {
    type Item = SearchResult;
    type IntoIter = std::vec::IntoIter<SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a> IntoIterator for &'a Hits {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // each hit on its own line
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    {:?}: {:.6}", hit.id, hit.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl Display for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, hit) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. {} ({:.6})", rank + 1, hit.id, hit.score)?;
        }
        Ok(())
    }
}

/// cosθ = q・d / (|q||d|)
///
/// A zero norm on either side scores 0.0. The result is clamped to
/// `[0, 1]` so rounding never pushes a self-match above 1.
#[inline]
pub fn cosine_similarity(query: &ZeroSpVec<f64>, query_norm: f64, doc: &ZeroSpVec<f64>, doc_norm: f64) -> f64 {
    if query_norm == 0.0 || doc_norm == 0.0 {
        return 0.0;
    }
    let score = query.dot::<f64>(doc) / (query_norm * doc_norm);
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Candidate during top-k selection. Greater means ranked earlier.
#[derive(Debug, Clone, Copy)]
struct Ranked<'a> {
    score: f64,
    id: &'a str,
}

impl Ord for Ranked<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.id.cmp(self.id))
    }
}

impl PartialOrd for Ranked<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked<'_> {}

/// Bounded min-heap keeping the `k` best candidates.
struct TopK<'a> {
    k: usize,
    heap: BinaryHeap<Reverse<Ranked<'a>>>,
}

impl<'a> TopK<'a> {
    fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.saturating_add(1).min(1024)),
        }
    }

    #[inline]
    fn push(&mut self, candidate: Ranked<'a>) {
        if self.heap.len() < self.k {
            self.heap.push(Reverse(candidate));
        } else if self.heap.peek().is_some_and(|Reverse(worst)| candidate > *worst) {
            self.heap.pop();
            self.heap.push(Reverse(candidate));
        }
    }

    fn merge(mut self, other: TopK<'a>) -> Self {
        for Reverse(candidate) in other.heap {
            self.push(candidate);
        }
        self
    }

    fn into_hits(self) -> Hits {
        // ascending Reverse order is best-first
        let list = self
            .heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(r)| SearchResult {
                id: r.id.to_string(),
                score: r.score,
            })
            .collect();
        Hits { list }
    }
}

/// Rank `documents` against `query` by cosine similarity and keep the best `k`.
///
/// The result length is `min(k, documents)`, sorted by score descending with
/// ties broken by ascending document id.
pub fn rank<'a, I>(query: &ZeroSpVec<f64>, documents: I, k: usize) -> Hits
where
    I: IntoIterator<Item = &'a DocumentRecord>,
{
    let query_norm = query.norm();
    let mut top = TopK::new(k);
    for doc in documents {
        top.push(Ranked {
            score: cosine_similarity(query, query_norm, doc.vector(), doc.norm()),
            id: doc.id(),
        });
    }
    top.into_hits()
}

/// Parallel variant of [`rank`]. Produces exactly the same hits.
pub fn par_rank<'a, I>(query: &ZeroSpVec<f64>, documents: I, k: usize) -> Hits
where
    I: IntoParallelIterator<Item = &'a DocumentRecord>,
{
    let query_norm = query.norm();
    documents
        .into_par_iter()
        .fold(
            || TopK::new(k),
            |mut top, doc| {
                top.push(Ranked {
                    score: cosine_similarity(query, query_norm, doc.vector(), doc.norm()),
                    id: doc.id(),
                });
                top
            },
        )
        .reduce(|| TopK::new(k), TopK::merge)
        .into_hits()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec(pairs: &[(u32, f64)]) -> ZeroSpVec<f64> {
        pairs.iter().copied().collect()
    }

    fn record(id: &str, pairs: &[(u32, f64)]) -> DocumentRecord {
        let counts = pairs.iter().map(|&(i, _)| (i, 1u32)).collect();
        DocumentRecord::new(id.to_string(), counts, vec(pairs), 0)
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let a = vec(&[(0, 1.0), (2, 2.0)]);
        let b = vec(&[(0, 2.0), (2, 4.0)]);
        let score = cosine_similarity(&a, a.norm(), &b, b.norm());
        assert!((score - 1.0).abs() < 1e-12);
        assert!(score <= 1.0);
    }

    #[test]
    fn zero_norms_score_zero() {
        let a = vec(&[(0, 1.0)]);
        let empty = ZeroSpVec::new();
        assert_eq!(cosine_similarity(&empty, 0.0, &a, a.norm()), 0.0);
        assert_eq!(cosine_similarity(&a, a.norm(), &empty, 0.0), 0.0);
    }

    #[test]
    fn ties_break_by_ascending_id() {
        let docs = vec![
            record("c", &[(0, 1.0)]),
            record("a", &[(0, 1.0)]),
            record("b", &[(0, 1.0)]),
            record("z", &[(1, 1.0)]),
        ];
        let hits = rank(&vec(&[(0, 1.0)]), &docs, 10);
        assert_eq!(hits.ids(), vec!["a", "b", "c", "z"]);
        assert_eq!(hits.score_of("z"), Some(0.0));
    }

    #[test]
    fn keeps_only_k_best() {
        let docs = vec![
            record("low", &[(0, 1.0), (1, 5.0)]),
            record("high", &[(0, 1.0)]),
            record("mid", &[(0, 1.0), (1, 1.0)]),
        ];
        let hits = rank(&vec(&[(0, 1.0)]), &docs, 2);
        assert_eq!(hits.ids(), vec!["high", "mid"]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let docs: Vec<DocumentRecord> = (0..200)
            .map(|i| record(&format!("doc{i:03}"), &[(i % 7, 1.0 + (i % 3) as f64), (7 + i % 5, 1.0)]))
            .collect();
        let query = vec(&[(2, 1.0), (8, 0.5)]);
        for k in [1, 5, 50, 500] {
            assert_eq!(rank(&query, &docs, k), par_rank(&query, &docs, k));
        }
    }

    #[test]
    fn display_lists_ranks() {
        let hits = Hits::new(vec![
            SearchResult { id: "a".into(), score: 0.5 },
            SearchResult { id: "b".into(), score: 0.25 },
        ]);
        let text = hits.to_string();
        assert!(text.starts_with("  1. a (0.500000)"));
        assert!(format!("{hits:#?}").contains("\"b\": 0.250000"));
    }
}
