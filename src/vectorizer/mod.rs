pub mod corpus;
pub mod evaluate;
pub mod index;
pub mod shared;
pub mod term;
pub mod tfidf;
