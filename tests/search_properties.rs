use tfidf_index::{tokenize, Index, IndexError, SearchResult, SharedIndex};

fn corpus() -> Vec<(&'static str, &'static str)> {
    vec![
        ("doc-1", "Rust guarantees memory safety without a garbage collector."),
        ("doc-2", "The borrow checker enforces ownership and borrowing rules."),
        ("doc-3", "Cargo is the Rust package manager and build tool."),
        ("doc-4", "Python uses a garbage collector and reference counting."),
        ("doc-5", "Tokio is an asynchronous runtime for Rust."),
    ]
}

fn fitted() -> Index {
    let mut index = Index::new();
    index.fit(corpus()).unwrap();
    index
}

#[test]
fn end_to_end_cat_and_dog() {
    let mut index = Index::new();
    index.fit([("a", "the cat sat"), ("b", "the dog ran")]).unwrap();

    let top = index.search("cat", 1).unwrap().into_vec();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, "a");
    assert!(top[0].score > 0.0);

    let both = index.search("cat", 2).unwrap();
    assert_eq!(both.ids(), vec!["a", "b"]);
    assert_eq!(both.score_of("b"), Some(0.0));
}

#[test]
fn repeated_searches_are_identical() {
    let index = fitted();
    for query in ["rust", "garbage collector", "rust package", "unknown"] {
        let first = index.search(query, 5).unwrap();
        for _ in 0..10 {
            assert_eq!(index.search(query, 5).unwrap(), first);
        }
    }
}

#[test]
fn scores_are_sorted_and_bounded() {
    let index = fitted();
    let hits = index.search("rust garbage collector", 5).unwrap();
    assert_eq!(hits.len(), 5);
    for pair in hits.list.windows(2) {
        assert!(pair[0].score >= pair[1].score);
        if pair[0].score == pair[1].score {
            assert!(pair[0].id < pair[1].id);
        }
    }
    assert!(hits.iter().all(|hit| (0.0..=1.0).contains(&hit.score)));
}

#[test]
fn each_document_finds_itself_first() {
    let index = fitted();
    for (id, text) in corpus() {
        let normalized = tokenize(text).join(" ");
        let top = index.search(&normalized, 1).unwrap();
        assert_eq!(top.ids(), vec![id]);
        assert!(top.list[0].score <= 1.0);
    }
}

#[test]
fn out_of_vocabulary_query_is_all_zero() {
    let index = fitted();
    let hits = index.search("zebra!!! quokka???", 100).unwrap();
    assert_eq!(hits.len(), 5);
    assert!(hits.iter().all(|hit| hit.score == 0.0 && !hit.score.is_nan()));
    assert_eq!(hits.ids(), vec!["doc-1", "doc-2", "doc-3", "doc-4", "doc-5"]);
}

#[test]
fn k_is_clamped_to_corpus_size() {
    let mut index = Index::new();
    index.fit([("x", "one"), ("y", "two"), ("z", "three")]).unwrap();
    assert_eq!(index.search("one", 1000).unwrap().len(), 3);
    assert_eq!(index.search("one", 0), Err(IndexError::InvalidK));
}

#[test]
fn duplicate_add_is_rejected_atomically() {
    let mut index = fitted();
    let size = index.size();
    let vocab = index.vocabulary_len();
    let err = index.add("doc-3", "brand new words").unwrap_err();
    assert_eq!(err, IndexError::DuplicateDocumentId("doc-3".into()));
    assert_eq!(err.to_string(), "duplicate document id: doc-3");
    assert_eq!(index.size(), size);
    assert_eq!(index.vocabulary_len(), vocab);
}

#[test]
fn vocabulary_grows_monotonically() {
    let mut index = fitted();
    let snapshot: Vec<(String, u32)> = index
        .corpus()
        .vocabulary()
        .iter()
        .map(|(id, term)| (term.to_string(), id))
        .collect();

    let mut last_len = index.vocabulary_len();
    for (i, text) in ["rust again", "entirely novel vocabulary", "", "novel rust"].iter().enumerate() {
        index.add(format!("extra-{i}"), text).unwrap();
        assert!(index.vocabulary_len() >= last_len);
        last_len = index.vocabulary_len();
    }
    for (term, id) in snapshot {
        assert_eq!(index.term_id(&term), Some(id));
    }
}

#[test]
fn results_serialize_for_downstream_use() {
    let index = fitted();
    let hits = index.search("tokio runtime", 1).unwrap();
    let json = serde_json::to_string(&hits.list).unwrap();
    let back: Vec<SearchResult> = serde_json::from_str(&json).unwrap();
    assert_eq!(back[0].id, "doc-5");
}

#[test]
fn shared_index_serves_concurrent_readers() {
    let shared = SharedIndex::new();
    shared.fit(corpus()).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let hits = shared.search("rust", 3).unwrap();
                assert_eq!(hits.len(), 3);
            });
        }
        scope.spawn(|| shared.add("doc-6", "Rust async traits").unwrap());
    });

    assert_eq!(shared.size(), 6);
    assert_eq!(shared.add("doc-6", "again"), Err(IndexError::DuplicateDocumentId("doc-6".into())));
}
