// Trendline: topic evolution analysis over a corpus of research papers.
//
// This is the library root. Each module corresponds to a major subsystem:
// where papers come from, how topics are extracted, the analyses built on
// them, and how results are shown and saved.

pub mod analysis;
pub mod config;
pub mod corpus;
pub mod output;
pub mod status;
pub mod topics;
