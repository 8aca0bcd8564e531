use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    config::IndexConfig,
    error::Result,
    vectorizer::{
        evaluate::scoring::Hits,
        index::Index,
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
    },
};

/// Cloneable, thread-safe handle to an [`Index`].
///
/// Single writer, many readers: `fit`, `add` and `refresh` take the write
/// lock; `search`, `size` and `contains` share the read lock. Clones point
/// at the same index.
#[derive(Debug)]
pub struct SharedIndex<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    inner: Arc<RwLock<Index<E>>>,
}

impl<E> Clone for SharedIndex<E>
where
    E: TFIDFEngine,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for SharedIndex<DefaultTFIDFEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedIndex<DefaultTFIDFEngine> {
    pub fn new() -> Self {
        Self::from_index(Index::new())
    }
}

impl<E> SharedIndex<E>
where
    E: TFIDFEngine,
{
    pub fn with_config(config: IndexConfig) -> Self {
        Self::from_index(Index::with_config(config))
    }

    pub fn from_index(index: Index<E>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    pub fn fit<I, K, T>(&self, corpus: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: AsRef<str>,
    {
        self.inner.write().fit(corpus)
    }

    pub fn add(&self, id: impl Into<String>, text: &str) -> Result<()> {
        self.inner.write().add(id, text)
    }

    pub fn refresh(&self) -> usize {
        self.inner.write().refresh()
    }

    pub fn search(&self, query: &str, k: usize) -> Result<Hits> {
        self.inner.read().search(query, k)
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().contains(id)
    }

    /// Shared access for several reads under one lock
    pub fn read(&self) -> RwLockReadGuard<'_, Index<E>> {
        self.inner.read()
    }

    /// Exclusive access for several writes under one lock
    pub fn write(&self) -> RwLockWriteGuard<'_, Index<E>> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_state() {
        let shared = SharedIndex::new();
        let other = shared.clone();
        shared.fit([("a", "hello world")]).unwrap();
        other.add("b", "hello there").unwrap();
        assert_eq!(shared.size(), 2);
        assert!(shared.contains("b"));
    }

    #[test]
    fn readers_and_writer_interleave() {
        let shared = SharedIndex::new();
        shared
            .fit((0..20).map(|i| (format!("seed{i}"), format!("seed text {i}"))))
            .unwrap();

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    shared.add(format!("new{i}"), &format!("fresh words {i}")).unwrap();
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        let hits = shared.search("seed text", 5).unwrap();
                        assert_eq!(hits.len(), 5);
                        assert!(hits.iter().all(|hit| hit.score <= 1.0));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(shared.size(), 70);
        assert_eq!(shared.read().stale_len(), 70 - 1);
    }
}
