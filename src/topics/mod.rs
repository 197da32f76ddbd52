// Topic extraction — generative extraction with a TF-IDF fallback.

pub mod generative;
pub mod staged;
pub mod tfidf;
pub mod traits;

pub use staged::StagedExtractor;
pub use traits::TopicExtractor;
