//! Runtime configuration

use crate::corpus::CorpusVariant;
use crate::highlight::Highlighter;
use crate::pattern::normal::NON_CONSONANT;
use crate::pattern::NormalCompiler;
use crate::pagination::DEFAULT_PER_PAGE;
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_CACHE_CAPACITY: usize = 256;
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `normal.json` and `diacritics.json`
    pub data_dir: PathBuf,
    pub per_page: usize,
    /// Number of distinct queries whose results are kept
    pub cache_capacity: usize,
    pub bind_addr: String,
    pub mark_open: String,
    pub mark_close: String,
    /// What letter queries allow between consecutive consonants
    pub nonconsonant: String,
}

impl Default for Config {
    fn default() -> Self {
        let marks = Highlighter::default();
        Self {
            data_dir: get_data_dir(),
            per_page: DEFAULT_PER_PAGE,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            mark_open: marks.open,
            mark_close: marks.close,
            nonconsonant: NON_CONSONANT.to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by `AYAT_*` environment variables. Unparsable
    /// numbers are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("AYAT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(n) = parse_number(&lookup, "AYAT_PER_PAGE") {
            config.per_page = n.max(1);
        }
        if let Some(n) = parse_number(&lookup, "AYAT_CACHE_CAPACITY") {
            config.cache_capacity = n;
        }
        if let Some(addr) = lookup("AYAT_BIND") {
            config.bind_addr = addr;
        }
        if let Some(open) = lookup("AYAT_MARK_OPEN") {
            config.mark_open = open;
        }
        if let Some(close) = lookup("AYAT_MARK_CLOSE") {
            config.mark_close = close;
        }
        if let Some(nonconsonant) = lookup("AYAT_NONCONSONANT") {
            config.nonconsonant = nonconsonant;
        }

        config
    }

    pub fn highlighter(&self) -> Highlighter {
        Highlighter::new(self.mark_open.clone(), self.mark_close.clone())
    }

    pub fn compiler(&self) -> NormalCompiler {
        NormalCompiler::with_nonconsonant(self.nonconsonant.clone())
    }
}

fn parse_number(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring non-numeric setting");
            None
        }
    }
}

fn has_corpus(dir: &std::path::Path) -> bool {
    CorpusVariant::ALL.iter().any(|v| dir.join(v.file_name()).exists())
}

/// Where the corpus files live when `AYAT_DATA_DIR` is not set
pub fn get_data_dir() -> PathBuf {
    // Dev mode: data checked out next to the workspace
    #[cfg(debug_assertions)]
    {
        let dev_paths = [PathBuf::from("data"), PathBuf::from("../data")];
        for path in &dev_paths {
            if has_corpus(path) {
                return path.canonicalize().unwrap_or_else(|_| path.clone());
            }
        }
    }

    // Portable mode: data folder next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let portable = exe_dir.join("data");
            if has_corpus(&portable) {
                return portable;
            }
        }
    }

    dirs::data_dir()
        .map(|d| d.join("ayat"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.per_page, 10);
        assert_eq!(config.cache_capacity, 256);
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.highlighter(), Highlighter::default());
        assert_eq!(config.nonconsonant, NON_CONSONANT);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("AYAT_DATA_DIR", "/srv/ayat"),
            ("AYAT_PER_PAGE", "20"),
            ("AYAT_CACHE_CAPACITY", "oops"),
            ("AYAT_MARK_OPEN", "**"),
            ("AYAT_MARK_CLOSE", "**"),
            ("AYAT_NONCONSONANT", "[\u{064B}-\u{0652}]*"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/srv/ayat"));
        assert_eq!(config.per_page, 20);
        assert_eq!(config.cache_capacity, 256);
        assert_eq!(config.highlighter(), Highlighter::new("**", "**"));
        assert_eq!(config.nonconsonant, "[\u{064B}-\u{0652}]*");
    }

    #[test]
    fn test_per_page_never_zero() {
        let config = Config::from_lookup(lookup(&[("AYAT_PER_PAGE", "0")]));
        assert_eq!(config.per_page, 1);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{"per_page": 5, "data_dir": "d"}"#).unwrap();
        assert_eq!(config.per_page, 5);
        assert_eq!(config.data_dir, PathBuf::from("d"));
        assert_eq!(config.mark_open, "<mark>");
    }
}
