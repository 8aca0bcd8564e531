use indexmap::IndexSet;

use crate::utils::math::vector::ZeroSpVec;
use crate::vectorizer::term::TermFrequency;

/// Dense term identifier, assigned in first-seen order.
pub type TermId = u32;

/// Append-only term -> id mapping.
///
/// The id of a term is its insertion position, so ids are dense
/// (`0..len`) and never change or get reused once assigned.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: IndexSet<Box<str>>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self {
            terms: IndexSet::new(),
        }
    }

    /// Id of `term`, assigning the next free id if it is new.
    #[inline]
    pub fn get_or_insert(&mut self, term: &str) -> TermId {
        if let Some(idx) = self.terms.get_index_of(term) {
            return idx as TermId;
        }
        let (idx, _) = self.terms.insert_full(term.into());
        idx as TermId
    }

    #[inline]
    pub fn get(&self, term: &str) -> Option<TermId> {
        self.terms.get_index_of(term).map(|idx| idx as TermId)
    }

    /// Term for an id, if assigned.
    #[inline]
    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get_index(id as usize).map(|t| t.as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (TermId, &str)> {
        self.terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (idx as TermId, term.as_ref()))
    }
}

/// Per-term document frequency plus the number of documents observed.
///
/// Counts only grow. Each observed document bumps a term's count at most once.
#[derive(Debug, Clone, Default)]
pub struct DocumentFrequency {
    counts: Vec<u64>,
    doc_num: u64,
}

impl DocumentFrequency {
    pub fn new() -> Self {
        Self {
            counts: Vec::new(),
            doc_num: 0,
        }
    }

    /// Number of documents containing term `id`. 0 for unknown ids.
    #[inline]
    pub fn get(&self, id: TermId) -> u64 {
        self.counts.get(id as usize).copied().unwrap_or(0)
    }

    /// Number of documents observed so far.
    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    #[inline]
    fn increment(&mut self, id: TermId) {
        let idx = id as usize;
        if idx >= self.counts.len() {
            self.counts.resize(idx + 1, 0);
        }
        self.counts[idx] += 1;
    }
}

/// Corpus statistics: the vocabulary and its document-frequency table.
///
/// It does not store document text or ids; the index owns those.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    vocabulary: Vocabulary,
    doc_freq: DocumentFrequency,
}

impl Corpus {
    pub fn new() -> Self {
        Self {
            vocabulary: Vocabulary::new(),
            doc_freq: DocumentFrequency::new(),
        }
    }

    /// Register one document.
    ///
    /// New terms get the next ids in first-seen order, every distinct term's
    /// document frequency goes up by one, and the document counter advances.
    ///
    /// # Returns
    /// * `ZeroSpVec<u32>` - raw occurrence count per term id for this document
    pub fn observe(&mut self, freq: &TermFrequency) -> ZeroSpVec<u32> {
        let mut pairs = Vec::with_capacity(freq.term_num());
        for (term, count) in freq.iter() {
            let id = self.vocabulary.get_or_insert(term);
            self.doc_freq.increment(id);
            pairs.push((id, count));
        }
        self.doc_freq.doc_num += 1;
        ZeroSpVec::from_unsorted(pairs)
    }

    /// Raw counts for the terms already in the vocabulary.
    /// Unknown terms are dropped and nothing is registered.
    pub fn lookup(&self, freq: &TermFrequency) -> ZeroSpVec<u32> {
        freq.iter()
            .filter_map(|(term, count)| self.vocabulary.get(term).map(|id| (id, count)))
            .collect()
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn doc_freq(&self) -> &DocumentFrequency {
        &self.doc_freq
    }

    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_freq.doc_num()
    }
}
