//! Query classification and input validation

use crate::corpus::CorpusVariant;
use crate::numerals::{is_numeral, is_numeral_str, to_arabic_indic};
use serde::{Deserialize, Serialize};

/// Which notation the user is typing in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Consonantal letters, matched against the normal corpus
    Normal,
    /// Diacritic marks with `+`/`-` wildcards, matched against the diacritics corpus
    Diacritics,
}

fn is_arabic_letter(c: char) -> bool {
    matches!(c, '\u{0621}'..='\u{064A}')
}

fn is_annotation_mark(c: char) -> bool {
    matches!(c, '\u{06D4}'..='\u{06ED}')
}

pub(crate) fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{0652}')
}

impl Mode {
    /// Decide the mode from the first non-whitespace character
    pub fn classify(raw: &str) -> Option<Mode> {
        let first = raw.trim_start().chars().next()?;
        if is_arabic_letter(first)
            || is_annotation_mark(first)
            || first == ':'
            || is_numeral(first)
        {
            Some(Mode::Normal)
        } else if is_diacritic(first) || first == '+' || first == '-' {
            Some(Mode::Diacritics)
        } else {
            None
        }
    }

    /// Drop characters the mode has no use for
    pub fn validate(&self, raw: &str) -> String {
        match self {
            Mode::Normal => validate_normal(raw),
            Mode::Diacritics => raw
                .chars()
                .filter(|&c| is_diacritic(c) || c == '+' || c == '-')
                .collect(),
        }
    }

    pub fn variant(&self) -> CorpusVariant {
        match self {
            Mode::Normal => CorpusVariant::Normal,
            Mode::Diacritics => CorpusVariant::Diacritics,
        }
    }
}

/// Keep letters, marks up to sukun, digits, colons and single spaces; digits become Arabic-Indic
fn validate_normal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if matches!(c, '\u{0621}'..='\u{0652}') || is_numeral(c) || c == ':' {
            out.push(c);
        }
    }
    to_arabic_indic(&out)
}

/// A classified, validated query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParsedQuery {
    /// First character belongs to neither notation
    Invalid,
    /// Pattern search over verse text
    Content { mode: Mode, keyword: String },
    /// `surah[:verse]` lookup against the normal corpus
    Title { keyword: String, keynum: Option<String> },
}

impl ParsedQuery {
    pub fn parse(raw: &str) -> Self {
        let Some(mode) = Mode::classify(raw) else {
            return ParsedQuery::Invalid;
        };

        let value = mode.validate(raw);
        if mode == Mode::Normal && (value.contains(':') || is_numeral_str(value.trim())) {
            return Self::title(&value);
        }

        ParsedQuery::Content { mode, keyword: value }
    }

    /// Split `keyword:keynum`, ignoring whitespace around the colon
    fn title(value: &str) -> Self {
        let mut parts = value.splitn(3, ':');
        let keyword = parts.next().unwrap_or_default().trim().to_string();
        let keynum = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        ParsedQuery::Title { keyword, keynum }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self {
            ParsedQuery::Invalid => None,
            ParsedQuery::Content { mode, .. } => Some(*mode),
            ParsedQuery::Title { .. } => Some(Mode::Normal),
        }
    }

    /// Corpus variant the query runs against
    pub fn variant(&self) -> Option<CorpusVariant> {
        self.mode().map(|m| m.variant())
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, ParsedQuery::Invalid)
    }
}
