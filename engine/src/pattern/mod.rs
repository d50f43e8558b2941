//! Query-to-pattern compilation

pub mod diacritics;
pub mod normal;

use crate::error::AyatError;
use crate::query::Mode;
use fancy_regex::Regex;
use std::borrow::Cow;

pub use normal::NormalCompiler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Consonant sequence from a letter query
    Text,
    /// Mark sequence from a diacritic query; `optional` is the number of `+` wildcards
    Diacritic { optional: usize },
}

impl PatternKind {
    /// Text the pattern runs against. Diacritic patterns are anchored on
    /// spaces, so the verse is padded to make its first and last words eligible.
    /// Counts therefore include those words, unlike matching the bare verse.
    pub fn subject<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            PatternKind::Text => Cow::Borrowed(text),
            PatternKind::Diacritic { .. } => Cow::Owned(format!(" {} ", text)),
        }
    }
}

/// A query compiled once and run against every verse
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    kind: PatternKind,
    source: String,
    matcher: Option<Regex>,
    marking: Option<Regex>,
}

impl CompiledPattern {
    fn build(kind: PatternKind, source: String) -> Result<Self, AyatError> {
        if source.is_empty() {
            return Ok(Self { kind, source, matcher: None, marking: None });
        }
        let matcher = Regex::new(&source)?;
        let marking = Regex::new(&format!("({})", source))?;
        tracing::debug!(?kind, pattern = %source, "compiled pattern");
        Ok(Self { kind, source, matcher: Some(matcher), marking: Some(marking) })
    }

    pub fn normal(query: &str) -> Result<Self, AyatError> {
        Self::with_compiler(&NormalCompiler::default(), query)
    }

    pub fn with_compiler(compiler: &NormalCompiler, query: &str) -> Result<Self, AyatError> {
        Self::build(PatternKind::Text, compiler.compile(query))
    }

    pub fn diacritics(query: &str) -> Result<Self, AyatError> {
        let kind = PatternKind::Diacritic { optional: diacritics::optional_count(query) };
        Self::build(kind, diacritics::compile(query))
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True for a pattern compiled from an empty query; it matches nothing
    pub fn is_empty(&self) -> bool {
        self.matcher.is_none()
    }

    /// Number of non-overlapping occurrences in a verse
    pub fn count(&self, text: &str) -> Result<usize, AyatError> {
        let Some(matcher) = &self.matcher else {
            return Ok(0);
        };
        let subject = self.kind.subject(text);
        let mut count = 0;
        for m in matcher.find_iter(&subject) {
            m?;
            count += 1;
        }
        Ok(count)
    }

    /// The pattern wrapped in one outer group, used for highlighting
    pub(crate) fn marking(&self) -> Option<&Regex> {
        self.marking.as_ref()
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.source == other.source
    }
}

impl Mode {
    pub fn compile(&self, query: &str) -> Result<CompiledPattern, AyatError> {
        match self {
            Mode::Normal => CompiledPattern::normal(query),
            Mode::Diacritics => CompiledPattern::diacritics(query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shadda ahead of the vowel, as the Uthmani text stores it
    fn uthmani(text: &str) -> String {
        normal::reorder_marks(text)
    }

    #[test]
    fn test_normal_counts_occurrences() {
        let pattern = Mode::Normal.compile("هو").unwrap();
        assert_eq!(pattern.count(&uthmani("قُلْ هُوَ ٱللَّهُ أَحَدٌ")).unwrap(), 1);
        assert_eq!(pattern.count("بِسْمِ").unwrap(), 0);
    }

    #[test]
    fn test_divine_name_across_spellings() {
        let pattern = Mode::Normal.compile("الله").unwrap();
        assert_eq!(pattern.count(&uthmani("بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ")).unwrap(), 1);
        let two = uthmani("قُلْ هُوَ ٱللَّهُ أَحَدٌ ٱللَّهُ ٱلصَّمَدُ");
        assert_eq!(pattern.count(&two).unwrap(), 2);
    }

    #[test]
    fn test_empty_pattern_matches_nothing() {
        let pattern = Mode::Normal.compile("").unwrap();
        assert!(pattern.is_empty());
        assert_eq!(pattern.count("أي نص").unwrap(), 0);
    }

    #[test]
    fn test_fatha_then_optional_mark() {
        let pattern = Mode::Diacritics.compile("\u{064E}+").unwrap();
        assert_eq!(pattern.kind(), PatternKind::Diacritic { optional: 1 });
        // أَحَدٌ: fatha on alef, then a marked letter
        assert_eq!(pattern.count("قُلْ هُوَ اللَّهُ أَحَدٌ").unwrap(), 1);
        // fatha only past the first letter of each word
        assert_eq!(pattern.count("قُلْ هُوَ").unwrap(), 0);
        // bare consonants without fatha
        assert_eq!(pattern.count("قل هو").unwrap(), 0);
    }

    #[test]
    fn test_diacritic_pattern_reaches_first_and_last_word() {
        let pattern = Mode::Diacritics.compile("\u{064E}").unwrap();
        assert_eq!(pattern.count("أَحَدٌ").unwrap(), 1);
        assert_eq!(pattern.count("كَتَبَ وَ").unwrap(), 2);
    }

    #[test]
    fn test_bare_wildcard_needs_unmarked_letter() {
        let pattern = Mode::Diacritics.compile("\u{064E}-").unwrap();
        // قَالَ: fatha, then alef with no mark
        assert_eq!(pattern.count("قَالَ رَبِّ").unwrap(), 1);
        // رَبِّ: the letter after the fatha carries shadda
        assert_eq!(pattern.count("رَبِّ").unwrap(), 0);
        // قَلْ: the letter after the fatha carries sukun
        assert_eq!(pattern.count("قَلْ").unwrap(), 0);
        assert_eq!(pattern.count("قُلْ").unwrap(), 0);
    }

    #[test]
    fn test_mark_after_shadda_stays_on_same_letter() {
        let pattern = Mode::Diacritics.compile("\u{0651}\u{064E}").unwrap();
        // shadda then fatha on the same letter
        assert_eq!(pattern.count("\u{0631}\u{0651}\u{064E}\u{0628}").unwrap(), 1);
        // shadda then damma
        assert_eq!(pattern.count("\u{0631}\u{0651}\u{064F}\u{0628}").unwrap(), 0);
        // fatha on the following letter instead
        assert_eq!(pattern.count("\u{0631}\u{0651}\u{0628}\u{064E}").unwrap(), 0);
    }

    #[test]
    fn test_same_query_same_pattern() {
        let a = Mode::Normal.compile("يا ايها الذين").unwrap();
        let b = Mode::Normal.compile("يا ايها الذين").unwrap();
        assert_eq!(a, b);
    }
}
