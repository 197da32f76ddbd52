// Corpus access — where the analysed papers come from.
//
// The Corpus trait is the seam; SqliteCorpus (local store, default feature),
// WeaviateCorpus (remote collection) and MemoryCorpus implement it. Analyses
// only ever see a CorpusSession wrapping one of them.

pub mod memory;
pub mod models;
pub mod session;
pub mod traits;
pub mod weaviate;

#[cfg(feature = "sqlite")]
pub mod queries;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryCorpus;
pub use models::PaperRecord;
pub use session::CorpusSession;
pub use traits::Corpus;
