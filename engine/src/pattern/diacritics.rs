//! Diacritic query compiler
//!
//! Each mark in the query may sit on any consonant. `-` stands for a consonant
//! carrying no mark, `+` for a consonant with or without one. The compiled
//! pattern starts after a space and captures the rest of the word up to the
//! next space, so a match never crosses a word boundary.

const PLACEHOLDER: &str = "@";
const OPTIONAL_PLACEHOLDER: &str = "@?";

const CONSONANT: &str = "[\u{0621}-\u{064A}]";
const MARK: &str = "[\u{064B}-\u{0652}]";
const NOT_MARK: &str = "[^\u{064B}-\u{0652}]";
const SHADDA: char = '\u{0651}';
const SPACE: &str = " ";

/// Put an optional consonant placeholder in front of every query character
pub fn prefix_placeholders(query: &str) -> String {
    let mut out = String::with_capacity(query.len() * 3);
    for c in query.chars() {
        out.push_str(OPTIONAL_PLACEHOLDER);
        out.push(c);
    }
    out
}

/// `-`: a consonant with no mark after it
pub fn expand_bare(body: &str) -> String {
    body.replace("@?-", &format!("{PLACEHOLDER}(?={NOT_MARK})"))
}

/// `+`: a consonant optionally marked. Adds one capture group per `+`.
pub fn expand_optional(body: &str) -> String {
    body.replace(
        "@?+",
        &format!("({OPTIONAL_PLACEHOLDER}{MARK}|{PLACEHOLDER}(?={NOT_MARK}))"),
    )
}

/// The mark after a shadda belongs to the same consonant
pub fn attach_shadda(body: &str) -> String {
    body.replace(&format!("{SHADDA}{OPTIONAL_PLACEHOLDER}"), &SHADDA.to_string())
}

pub fn fill_consonants(body: &str) -> String {
    body.replace(PLACEHOLDER, CONSONANT)
}

/// Anchor to a word start and capture the remainder of the word
pub fn wrap_word(body: &str) -> String {
    format!("{SPACE}({body})(.*?(?={SPACE}))")
}

/// Pattern source for a validated diacritic query; empty when the query is empty
pub fn compile(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }
    let body = prefix_placeholders(query);
    let body = expand_bare(&body);
    let body = expand_optional(&body);
    let body = attach_shadda(&body);
    wrap_word(&fill_consonants(&body))
}

/// Number of `+` wildcards, which shifts the tail capture group
pub fn optional_count(query: &str) -> usize {
    query.matches('+').count()
}
