//! Matching compiled queries against the corpus

use crate::corpus::{Corpus, CorpusStore, VerseRecord};
use crate::error::AyatError;
use crate::numerals::{is_numeral_str, parse_numeral};
use crate::pattern::{CompiledPattern, NormalCompiler};
use crate::query::{Mode, ParsedQuery};
use serde::Serialize;
use std::sync::Arc;

/// One matched verse, by position in the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub index: usize,
    /// Pattern occurrences in the verse; 0 for title lookups, which count nothing
    pub occurrences: usize,
}

/// Matched verses in corpus order. Holds the corpus by reference count, not by copy.
#[derive(Debug, Clone)]
pub struct ResultSet {
    corpus: Option<Arc<Corpus>>,
    hits: Vec<Hit>,
    total_occurrences: Option<usize>,
    pattern: Option<Arc<CompiledPattern>>,
}

impl ResultSet {
    /// Result of an invalid query
    pub fn empty() -> Self {
        Self { corpus: None, hits: Vec::new(), total_occurrences: None, pattern: None }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    /// Sum of per-verse occurrences; absent for title lookups
    pub fn total_occurrences(&self) -> Option<usize> {
        self.total_occurrences
    }

    /// Pattern used for highlighting; absent for title lookups
    pub fn marking(&self) -> Option<&CompiledPattern> {
        self.pattern.as_deref()
    }

    pub fn get(&self, idx: usize) -> Option<(&VerseRecord, usize)> {
        let hit = self.hits.get(idx)?;
        let record = self.corpus.as_ref()?.get(hit.index)?;
        Some((record, hit.occurrences))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VerseRecord, usize)> + '_ {
        (0..self.hits.len()).filter_map(move |i| self.get(i))
    }

    /// Hits in `start..end`, clipped to the result length
    pub fn slice(
        &self,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = (&VerseRecord, usize)> + '_ {
        let end = end.min(self.hits.len());
        let start = start.min(end);
        (start..end).filter_map(move |i| self.get(i))
    }
}

/// Runs parsed queries against the corpus store
#[derive(Debug, Default)]
pub struct SearchEngine {
    compiler: NormalCompiler,
}

impl SearchEngine {
    pub fn new(compiler: NormalCompiler) -> Self {
        Self { compiler }
    }

    pub fn compile(&self, mode: Mode, keyword: &str) -> Result<CompiledPattern, AyatError> {
        match mode {
            Mode::Normal => CompiledPattern::with_compiler(&self.compiler, keyword),
            Mode::Diacritics => CompiledPattern::diacritics(keyword),
        }
    }

    /// Run a query. The corpus variant it needs must already be loaded.
    pub fn search(&self, query: &ParsedQuery, store: &CorpusStore) -> Result<ResultSet, AyatError> {
        match query {
            ParsedQuery::Invalid => Ok(ResultSet::empty()),
            ParsedQuery::Content { mode, keyword } => {
                let corpus = store.require(mode.variant())?;
                let pattern = self.compile(*mode, keyword)?;
                self.search_content(corpus, Arc::new(pattern))
            }
            ParsedQuery::Title { keyword, keynum } => {
                let corpus = store.require(Mode::Normal.variant())?;
                Ok(self.search_title(corpus, keyword, keynum.as_deref()))
            }
        }
    }

    /// Every verse with at least one occurrence of the pattern
    pub fn search_content(
        &self,
        corpus: Arc<Corpus>,
        pattern: Arc<CompiledPattern>,
    ) -> Result<ResultSet, AyatError> {
        let mut hits = Vec::new();
        let mut total = 0;

        if !pattern.is_empty() {
            for (index, record) in corpus.records().iter().enumerate() {
                let occurrences = pattern.count(&record.ayah)?;
                if occurrences > 0 {
                    total += occurrences;
                    hits.push(Hit { index, occurrences });
                }
            }
        }

        tracing::debug!(
            variant = %corpus.variant(),
            verses = hits.len(),
            occurrences = total,
            "content search"
        );

        Ok(ResultSet {
            corpus: Some(corpus),
            hits,
            total_occurrences: Some(total),
            pattern: Some(pattern),
        })
    }

    /// `surah[:verse]` lookup. A numeral keyword is a surah number, anything
    /// else a fragment of the surah name. A verse number that is not a
    /// numeral matches nothing.
    pub fn search_title(
        &self,
        corpus: Arc<Corpus>,
        keyword: &str,
        keynum: Option<&str>,
    ) -> ResultSet {
        let verse = match keynum {
            None => None,
            Some(n) => match parse_numeral(n) {
                Some(n) => Some(n),
                None => return Self::title_results(corpus, Vec::new()),
            },
        };
        let verse_matches = |r: &VerseRecord| verse.map_or(true, |n| r.anum == n);

        let hits = if is_numeral_str(keyword) {
            match parse_numeral(keyword) {
                Some(snum) => Self::collect(&corpus, |r| r.snum == snum && verse_matches(r)),
                None => Vec::new(),
            }
        } else {
            Self::collect(&corpus, |r| r.surah.contains(keyword) && verse_matches(r))
        };

        Self::title_results(corpus, hits)
    }

    fn collect(corpus: &Corpus, pred: impl Fn(&VerseRecord) -> bool) -> Vec<Hit> {
        corpus
            .records()
            .iter()
            .enumerate()
            .filter(|(_, r)| pred(r))
            .map(|(index, _)| Hit { index, occurrences: 0 })
            .collect()
    }

    fn title_results(corpus: Arc<Corpus>, hits: Vec<Hit>) -> ResultSet {
        ResultSet { corpus: Some(corpus), hits, total_occurrences: None, pattern: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusVariant;
    use crate::fixtures;

    fn engine_and_store() -> (SearchEngine, CorpusStore) {
        (SearchEngine::default(), fixtures::store())
    }

    #[test]
    fn test_title_lookup_surah_and_verse() {
        let (engine, store) = engine_and_store();
        let results = engine.search(&ParsedQuery::parse("2:255"), &store).unwrap();
        assert_eq!(results.len(), 1);
        let (record, _) = results.get(0).unwrap();
        assert_eq!((record.snum, record.anum), (2, 255));
        assert!(results.marking().is_none());
        assert_eq!(results.total_occurrences(), None);
        assert_eq!(results.hits()[0].occurrences, 0);
    }

    #[test]
    fn test_title_lookup_whole_surah_by_number() {
        let (engine, store) = engine_and_store();
        let results = engine.search(&ParsedQuery::parse("112"), &store).unwrap();
        let verses: Vec<u32> = results.iter().map(|(r, _)| r.anum).collect();
        assert_eq!(verses, vec![1, 2]);
    }

    #[test]
    fn test_title_lookup_by_name() {
        let (engine, store) = engine_and_store();
        let results = engine.search(&ParsedQuery::parse("الفاتحة:"), &store).unwrap();
        assert_eq!(results.len(), 2);

        let results = engine.search(&ParsedQuery::parse("الإخلاص:٢"), &store).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.get(0).unwrap().0.snum, 112);

        // empty keyword: verse 1 of every surah
        let results = engine.search(&ParsedQuery::parse(":1"), &store).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_title_lookup_malformed_verse_is_no_match() {
        let (engine, store) = engine_and_store();
        let query = ParsedQuery::Title { keyword: "٢".to_string(), keynum: Some("ب".to_string()) };
        let results = engine.search(&query, &store).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_content_search_keeps_corpus_order() {
        let (engine, store) = engine_and_store();
        let results = engine.search(&ParsedQuery::parse("الله"), &store).unwrap();
        let refs: Vec<(u32, u32)> = results.iter().map(|(r, _)| (r.snum, r.anum)).collect();
        assert_eq!(refs, vec![(1, 1), (2, 255), (112, 1), (112, 2)]);
        assert!(results.total_occurrences().unwrap() >= results.len());
    }

    #[test]
    fn test_total_occurrences_sums_counts() {
        let (engine, store) = engine_and_store();
        let results = engine.search(&ParsedQuery::parse("هو"), &store).unwrap();
        let sum: usize = results.iter().map(|(_, n)| n).sum();
        assert_eq!(results.total_occurrences(), Some(sum));
        // هُوَ in 2:255 and 112:1
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let (engine, store) = engine_and_store();
        let results = engine.search(&ParsedQuery::parse("ظظظ"), &store).unwrap();
        assert!(results.is_empty());
        assert_eq!(results.total_occurrences(), Some(0));
    }

    #[test]
    fn test_diacritic_search_uses_diacritics_corpus() {
        let (engine, store) = engine_and_store();
        let results = engine.search(&ParsedQuery::parse("\u{064E}+"), &store).unwrap();
        let refs: Vec<(u32, u32)> = results.iter().map(|(r, _)| (r.snum, r.anum)).collect();
        // رَبِّ, لَا and أَحَدٌ: fatha on the first letter, then another letter
        assert_eq!(refs, vec![(1, 2), (2, 255), (112, 1)]);
    }

    #[test]
    fn test_missing_corpus_is_not_ready() {
        let engine = SearchEngine::default();
        let store = CorpusStore::new("unused".into());
        store.insert(fixtures::normal()).unwrap();
        let err = engine.search(&ParsedQuery::parse("\u{064E}"), &store).unwrap_err();
        assert!(matches!(err, AyatError::CorpusNotReady(_)));
        assert!(store.get(CorpusVariant::Normal).is_some());
    }

    #[test]
    fn test_invalid_query_is_empty() {
        let (engine, store) = engine_and_store();
        let results = engine.search(&ParsedQuery::parse("xyz"), &store).unwrap();
        assert!(results.is_empty());
    }
}
