pub mod clean;
pub mod entities;
pub mod fusion;
pub mod lexicon;
pub mod newwords;
pub mod stopwords;
pub mod textrank;
pub mod tfidf;
pub mod tokenize;

pub use clean::clean;
pub use entities::extract_entities;
pub use fusion::batch_extract;
pub use newwords::discover_new_words;
pub use textrank::extract_textrank;
pub use tfidf::extract_tfidf;
pub use tokenize::tokenize;
