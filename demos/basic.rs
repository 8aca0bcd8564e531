use tfidf_index::{Index, IndexError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), IndexError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    // build index
    let mut index = Index::new();
    index.fit([
        ("intro", "Rust is a systems programming language focused on safety."),
        ("borrow", "The borrow checker validates references at compile time."),
        ("cargo", "Cargo builds your code and downloads your dependencies."),
    ])?;

    // documents can be added after fitting
    index.add("async", "Async Rust uses futures and an executor such as Tokio.")?;

    let hits = index.search("rust safety", 3)?;
    println!("Search Results: \n{}", hits);
    println!("{:#?}", hits);

    // older documents keep the idf they were stored with until refresh
    println!("stale documents: {}", index.stale_len());
    index.refresh();
    println!("after refresh: {}", index.search("rust safety", 3)?);

    match index.add("intro", "duplicate") {
        Err(err) => println!("rejected: {err}"),
        Ok(()) => unreachable!("duplicate ids are rejected"),
    }
    Ok(())
}
