//! Emphasis of matched spans in verse text

use crate::error::AyatError;
use crate::pattern::{CompiledPattern, PatternKind};
use fancy_regex::{Captures, Regex};
use serde::Deserialize;

/// Wraps matches in configurable open/close markers (`<mark>`/`</mark>` by default)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Highlighter {
    pub open: String,
    pub close: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self { open: "<mark>".to_string(), close: "</mark>".to_string() }
    }
}

impl Highlighter {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self { open: open.into(), close: close.into() }
    }

    /// Mark every occurrence of `pattern` in `text`. Without a pattern (title
    /// lookups) the text comes back unchanged.
    pub fn highlight(
        &self,
        text: &str,
        pattern: Option<&CompiledPattern>,
    ) -> Result<String, AyatError> {
        let Some(pattern) = pattern else {
            return Ok(text.to_string());
        };
        let Some(marking) = pattern.marking() else {
            return Ok(text.to_string());
        };

        match pattern.kind() {
            PatternKind::Text => replace_each(marking, text, |caps| {
                format!("{}{}{}", self.open, group(caps, 1), self.close)
            }),
            PatternKind::Diacritic { optional } => {
                // group 1 wraps the whole match, group 2 is the mark sequence,
                // then one group per `+`, then the rest of the word
                let tail = 3 + optional;
                let subject = pattern.kind().subject(text);
                let marked = replace_each(marking, &subject, |caps| {
                    format!(" {}{}{}{}", self.open, group(caps, 2), self.close, group(caps, tail))
                })?;
                let trimmed = marked.strip_prefix(' ').unwrap_or(marked.as_str());
                let trimmed = trimmed.strip_suffix(' ').unwrap_or(trimmed);
                Ok(trimmed.to_string())
            }
        }
    }
}

fn group<'t>(caps: &Captures<'t>, idx: usize) -> &'t str {
    caps.get(idx).map_or("", |m| m.as_str())
}

fn replace_each(
    re: &Regex,
    subject: &str,
    mut rep: impl FnMut(&Captures<'_>) -> String,
) -> Result<String, AyatError> {
    let mut out = String::with_capacity(subject.len() + 16);
    let mut last = 0;
    for caps in re.captures_iter(subject) {
        let caps = caps?;
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&subject[last..whole.start()]);
        out.push_str(&rep(&caps));
        last = whole.end();
    }
    out.push_str(&subject[last..]);
    Ok(out)
}

/// Presentation form of a verse: drops the small high meem and small low meem
/// signs and writes alef wasla as plain alef
pub fn display_form(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{06E2}' | '\u{06ED}'))
        .map(|c| if c == '\u{0671}' { '\u{0627}' } else { c })
        .collect()
}
