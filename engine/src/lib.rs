//! Ayat - Arabic verse search
//!
//! Query classification, pattern compilation, matching, highlighting and
//! pagination over the two corpus variants.

// Leaves first: numerals and corpus are used by everything above them
pub mod error;
pub mod numerals;
pub mod corpus;
pub mod query;
pub mod pattern;
pub mod search;
pub mod highlight;
pub mod pagination;
pub mod cache;
pub mod config;
pub mod state;
pub mod session;

#[cfg(test)]
mod fixtures;

pub use error::AyatError;
pub use corpus::{Corpus, CorpusStore, CorpusVariant, VerseRecord};
pub use query::{Mode, ParsedQuery};
pub use pattern::{CompiledPattern, NormalCompiler, PatternKind};
pub use search::{Hit, ResultSet, SearchEngine};
pub use highlight::{display_form, Highlighter};
pub use pagination::{PageItem, Paginator};
pub use cache::ResultCache;
pub use config::{get_data_dir, Config};
pub use state::{format_stats, AppState, SearchPage, VerseView};
pub use session::{Outcome, SearchSession};
