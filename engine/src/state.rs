//! Application state and the query-to-page pipeline

use crate::cache::ResultCache;
use crate::config::Config;
use crate::corpus::{Corpus, CorpusStore, CorpusVariant, VerseRecord};
use crate::error::AyatError;
use crate::highlight::{display_form, Highlighter};
use crate::numerals::to_arabic_indic;
use crate::pagination::{PageItem, Paginator};
use crate::query::{Mode, ParsedQuery};
use crate::search::{ResultSet, SearchEngine};
use serde::Serialize;
use std::sync::Arc;

/// One rendered result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseView {
    /// Highlighted verse in display form
    pub text: String,
    pub surah: String,
    pub snum: u32,
    pub anum: u32,
    /// "surah:verse", verse in Arabic-Indic digits
    pub reference: String,
    /// "verse:surah-number" tooltip
    pub tip: String,
    pub occurrences: usize,
}

/// A page of results ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPage {
    pub mode: Option<Mode>,
    /// Matched verses, with the occurrence total when there is one
    pub stats: String,
    pub verses: usize,
    pub occurrences: Option<usize>,
    pub page: usize,
    pub total_pages: usize,
    /// Ordinal of the first result on this page (1-based)
    pub start: usize,
    pub results: Vec<VerseView>,
    pub pages: Vec<PageItem>,
    pub skip_title: String,
}

impl SearchPage {
    /// What an invalid or blank query shows
    pub fn blank() -> Self {
        Self {
            mode: None,
            stats: String::new(),
            verses: 0,
            occurrences: None,
            page: 1,
            total_pages: 0,
            start: 1,
            results: Vec::new(),
            pages: Vec::new(),
            skip_title: String::new(),
        }
    }
}

/// Stats line: verse count, then "/occurrences" when any were counted
pub fn format_stats(verses: usize, occurrences: Option<usize>) -> String {
    let text = match occurrences {
        Some(n) if n > 0 => format!("{}/{}", verses, n),
        _ => verses.to_string(),
    };
    to_arabic_indic(&text)
}

/// Shared state behind the API and search sessions
pub struct AppState {
    pub store: Arc<CorpusStore>,
    pub engine: Arc<SearchEngine>,
    pub cache: Arc<ResultCache>,
    pub highlighter: Highlighter,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = CorpusStore::new(config.data_dir.clone());
        Self::with_store(config, store)
    }

    /// State over an existing store (corpora may already be installed)
    pub fn with_store(config: Config, store: CorpusStore) -> Self {
        Self {
            store: Arc::new(store),
            engine: Arc::new(SearchEngine::new(config.compiler())),
            cache: Arc::new(ResultCache::new(config.cache_capacity)),
            highlighter: config.highlighter(),
            config,
        }
    }

    /// Load one corpus variant from the data directory
    pub async fn load(&self, variant: CorpusVariant) -> Result<Arc<Corpus>, AyatError> {
        self.store
            .load(variant)
            .await
            .map_err(|e| AyatError::Corpus(format!("{:#}", e)))
    }

    /// Load every variant, logging failures. Returns how many are ready.
    pub async fn load_all(&self) -> usize {
        let mut ready = 0;
        for variant in CorpusVariant::ALL {
            match self.load(variant).await {
                Ok(_) => ready += 1,
                Err(e) => tracing::warn!(%variant, error = %e, "corpus unavailable"),
            }
        }
        ready
    }

    /// Results for a parsed query, from the cache when possible. Invalid
    /// queries short-circuit to an empty set.
    pub fn results(&self, query: &ParsedQuery) -> Result<Arc<ResultSet>, AyatError> {
        if !query.is_valid() {
            return Ok(Arc::new(ResultSet::empty()));
        }
        self.cache.get_or_insert_with(query, || self.engine.search(query, &self.store))
    }

    /// Render one page of `results`. The page is clamped into range.
    pub fn render(
        &self,
        query: &ParsedQuery,
        results: &ResultSet,
        page: usize,
    ) -> Result<SearchPage, AyatError> {
        if !query.is_valid() {
            return Ok(SearchPage::blank());
        }

        let mut paginator = Paginator::with_state(1, results.len(), self.config.per_page);
        paginator.current_page = paginator.clamp(page);

        let views = results
            .slice(paginator.start(), paginator.end())
            .map(|(record, occurrences)| self.view(record, occurrences, results))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchPage {
            mode: query.mode(),
            stats: format_stats(results.len(), results.total_occurrences()),
            verses: results.len(),
            occurrences: results.total_occurrences(),
            page: paginator.current_page,
            total_pages: paginator.total_pages(),
            start: paginator.start() + 1,
            results: views,
            pages: paginator.page_range(),
            skip_title: paginator.skip_title(),
        })
    }

    fn view(
        &self,
        record: &VerseRecord,
        occurrences: usize,
        results: &ResultSet,
    ) -> Result<VerseView, AyatError> {
        let text = self.highlighter.highlight(&record.ayah, results.marking())?;
        let anum = to_arabic_indic(&record.anum.to_string());
        Ok(VerseView {
            text: display_form(&text),
            surah: record.surah.clone(),
            snum: record.snum,
            anum: record.anum,
            reference: format!("{}:{}", record.surah, anum),
            tip: format!("{}:{}", anum, to_arabic_indic(&record.snum.to_string())),
            occurrences,
        })
    }

    /// Raw input to a rendered page
    pub fn search(&self, raw: &str, page: usize) -> Result<SearchPage, AyatError> {
        let query = ParsedQuery::parse(raw);
        let results = self.results(&query)?;
        self.render(&query, &results, page)
    }
}
