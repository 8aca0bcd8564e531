use crate::utils::math::vector::ZeroSpVec;
use crate::vectorizer::corpus::Corpus;

/// TF-IDF calculation engine.
///
/// Implement this to plug a different weighting scheme into
/// [`Index<E>`](crate::Index). Implementations must return finite,
/// non-negative weights so cosine scores stay in `[0, 1]`.
pub trait TFIDFEngine {
    /// Term-frequency component from a raw occurrence count.
    fn tf(raw_count: u32) -> f64;

    /// Inverse document frequency.
    /// # Arguments
    /// * `doc_num` - documents observed so far
    /// * `doc_freq` - documents containing the term
    fn idf(doc_num: u64, doc_freq: u64) -> f64;

    /// Weight every in-vocabulary term of `counts` against the current
    /// corpus statistics.
    ///
    /// Ids beyond the vocabulary are skipped.
    fn tfidf_vec(counts: &ZeroSpVec<u32>, corpus: &Corpus) -> ZeroSpVec<f64> {
        let vocab_len = corpus.vocabulary().len();
        let doc_num = corpus.doc_num();
        let mut vec = ZeroSpVec::with_capacity(counts.nnz());
        for (id, &count) in counts.raw_iter() {
            if id as usize >= vocab_len {
                continue;
            }
            let idf = Self::idf(doc_num, corpus.doc_freq().get(id));
            vec.push(id, Self::tf(count) * idf);
        }
        vec
    }
}

/// Default TF-IDF engine
///
/// - `tf = raw count`
/// - `idf = ln((1 + N) / (1 + df)) + 1`
///
/// The `+1` smoothing keeps idf finite and strictly positive, including
/// for a term present in every document and for the very first document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn tf(raw_count: u32) -> f64 {
        raw_count as f64
    }

    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }
}
