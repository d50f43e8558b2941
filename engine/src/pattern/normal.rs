//! Letter query compiler
//!
//! A letter query is rewritten in stages, each a pure function:
//! cleanup ([`strip_metacharacters`], [`reorder_marks`], [`fold_vocative`]),
//! [`tokenize`] into letters and letter classes, [`segment`] into literal runs
//! and classes, then [`emit`] the final pattern. Every emitted unit is followed
//! by a lazy "non-consonant" run so vowel marks, small signs and tatweel may sit
//! between the letters the user typed.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Anything that is not a consonant or a space, lazily
pub const NON_CONSONANT: &str = "[^\u{0621}-\u{063A}\u{0641}-\u{064A}\u{0671} ]*?";

const METACHARACTERS: &str = ",@.[](){}-|^!$*+=\\";

static VOWEL_BEFORE_SHADDA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("([\u{064E}\u{0650}\u{064F}])([\u{0654}\u{0651}])").expect("static regex")
});

static VOCATIVE_INNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("( \u{0648}?\u{064A}\u{0627}) ").expect("static regex"));

static VOCATIVE_LEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^(\u{0648}?\u{064A}\u{0627}) ").expect("static regex"));

/// Letters that stand for a family of spellings in the Uthmani script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterClass {
    /// الذ: article fused with the relative pronoun
    ArticleRelative,
    /// الل: article before a lam, as in the divine name
    ArticleLam,
    /// ا
    Alef,
    /// ي
    Yeh,
    /// ى
    AlefMaksura,
    /// أ ء ؤ ئ
    Hamza,
    /// آ
    AlefMadda,
    /// و
    Waw,
    /// ن
    Noon,
}

impl LetterClass {
    fn of(c: char) -> Option<Self> {
        match c {
            '\u{0627}' => Some(LetterClass::Alef),
            '\u{064A}' => Some(LetterClass::Yeh),
            '\u{0649}' => Some(LetterClass::AlefMaksura),
            '\u{0623}' | '\u{0621}' | '\u{0624}' | '\u{0626}' => Some(LetterClass::Hamza),
            '\u{0622}' => Some(LetterClass::AlefMadda),
            '\u{0648}' => Some(LetterClass::Waw),
            '\u{0646}' => Some(LetterClass::Noon),
            _ => None,
        }
    }

    /// The alternation of spellings this class matches
    pub fn expansion(&self) -> &'static str {
        match self {
            LetterClass::ArticleRelative => "\u{0671}\u{0644}\u{0651}\u{064E}\u{0630}\u{0650}",
            LetterClass::ArticleLam => {
                "(?:(?:\u{0627}\u{0653}|\u{0671})\u{0644}\u{0644}\u{0651}|\u{0671}\u{0644}\u{0651}\u{064E}(?=.[\u{0652}\u{064E}\u{0670}]))"
            }
            LetterClass::Alef => "(?:[\u{0627}\u{0670}\u{0671}]|\u{0648}\u{0670}|\u{0649}\u{0670})",
            LetterClass::Yeh => {
                "(?:\u{0627}\u{06DF}[^ ]|[\u{0649}\u{064A}\u{06E6}\u{0640}](?![\u{0670}\u{0654}]))"
            }
            LetterClass::AlefMaksura => {
                "(?:[\u{0627}\u{06E6}\u{0670}\u{0649}](?![\u{064E}\u{0652}\u{0651}]))"
            }
            LetterClass::Hamza => "[\u{0654}\u{0626}\u{0621}\u{0625}\u{0624}\u{0623}]",
            LetterClass::AlefMadda => {
                "(?:\u{0621}\u{064E}\u{0627}|\u{0654}\u{064E}\u{0627}|\u{0622}|\u{0654}\u{064E}\u{0640}\u{0670})"
            }
            LetterClass::Waw => "[\u{0648}\u{06E5}]",
            LetterClass::Noon => "(?:\u{064A}\u{06DF})?[\u{0646}\u{06E8}]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Letter(char),
    Class(LetterClass),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Class(LetterClass),
}

/// Remove characters that would be read as pattern syntax
pub fn strip_metacharacters(query: &str) -> String {
    query.chars().filter(|c| !METACHARACTERS.contains(*c)).collect()
}

/// Put shadda and hamza-above ahead of a vowel, the order the corpus uses
pub fn reorder_marks(query: &str) -> String {
    VOWEL_BEFORE_SHADDA.replace_all(query, "$2$1").into_owned()
}

/// `يا` and `ويا` are written joined to the next word
pub fn fold_vocative(query: &str) -> String {
    let inner = VOCATIVE_INNER.replace_all(query, "$1");
    VOCATIVE_LEADING.replace_all(&inner, "$1").into_owned()
}

/// Split into letters and letter classes, three-letter classes first
pub fn tokenize(query: &str) -> Vec<Token> {
    const ARTICLE_RELATIVE: &str = "\u{0627}\u{0644}\u{0630}";
    const ARTICLE_LAM: &str = "\u{0627}\u{0644}\u{0644}";

    let mut tokens = Vec::new();
    let mut rest = query;
    while let Some(c) = rest.chars().next() {
        let (token, len) = if rest.starts_with(ARTICLE_RELATIVE) {
            (Token::Class(LetterClass::ArticleRelative), ARTICLE_RELATIVE.len())
        } else if rest.starts_with(ARTICLE_LAM) {
            (Token::Class(LetterClass::ArticleLam), ARTICLE_LAM.len())
        } else {
            let token = LetterClass::of(c).map_or(Token::Letter(c), Token::Class);
            (token, c.len_utf8())
        };
        tokens.push(token);
        rest = &rest[len..];
    }
    tokens
}

/// Group consecutive plain letters into literal runs
pub fn segment(tokens: &[Token]) -> Vec<Segment> {
    let mut segments = Vec::new();
    for token in tokens {
        match (token, segments.last_mut()) {
            (Token::Letter(c), Some(Segment::Literal(run))) => run.push(*c),
            (Token::Letter(c), _) => segments.push(Segment::Literal(c.to_string())),
            (Token::Class(class), _) => segments.push(Segment::Class(*class)),
        }
    }
    segments
}

/// Concatenate the segments, following every letter and class with `nonconsonant`
pub fn emit(segments: &[Segment], nonconsonant: &str) -> String {
    let mut pattern = String::new();
    for seg in segments {
        match seg {
            Segment::Literal(run) => {
                for c in run.chars() {
                    pattern.push(c);
                    pattern.push_str(nonconsonant);
                }
            }
            Segment::Class(class) => {
                pattern.push_str(class.expansion());
                pattern.push_str(nonconsonant);
            }
        }
    }
    pattern
}

#[derive(Debug, Clone)]
pub struct NormalCompiler {
    nonconsonant: String,
}

impl Default for NormalCompiler {
    fn default() -> Self {
        Self { nonconsonant: NON_CONSONANT.to_string() }
    }
}

impl NormalCompiler {
    pub fn with_nonconsonant(nonconsonant: impl Into<String>) -> Self {
        Self { nonconsonant: nonconsonant.into() }
    }

    /// Pattern source for a validated letter query; empty when nothing is left to match
    pub fn compile(&self, query: &str) -> String {
        let cleaned = fold_vocative(&reorder_marks(&strip_metacharacters(query)));
        let tokens = tokenize(&cleaned);
        emit(&segment(&tokens), &self.nonconsonant)
    }
}
