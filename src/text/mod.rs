//! Text utilities: normalization, sentence splitting, tokenization and
//! TF-IDF vectorization.

mod clean;
mod sentences;
mod stopwords;
mod tfidf;
mod tokens;

pub use clean::{normalize_run_text, normalize_whitespace, truncate_words, word_count};
pub use sentences::split_sentences;
pub use stopwords::is_stop_word;
pub use tfidf::{cosine_similarity, FittedTfidf, SparseVector, TfidfOptions, TfidfVectorizer};
pub use tokens::{analyzer_tokens, word_set};
