//! Verse records and the corpus store

use crate::error::AyatError;
use crate::numerals::parse_numeral;
use anyhow::{bail, Context, Result};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

const SURAH_COUNT: u32 = 114;

/// One verse of the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    pub ayah: String,
    #[serde(deserialize_with = "numeral")]
    pub anum: u32,
    #[serde(deserialize_with = "numeral")]
    pub snum: u32,
    pub surah: String,
}

/// Verse numbers show up both as JSON numbers and as digit strings in either numeral system
fn numeral<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => parse_numeral(s.trim())
            .ok_or_else(|| de::Error::custom(format!("invalid numeral: {:?}", s))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusVariant {
    /// Uthmani script, searched by letter queries and title lookups
    Normal,
    /// Fully vowelled simple script, searched by diacritic queries
    Diacritics,
}

impl CorpusVariant {
    pub const ALL: [CorpusVariant; 2] = [CorpusVariant::Normal, CorpusVariant::Diacritics];

    pub fn as_str(&self) -> &'static str {
        match self {
            CorpusVariant::Normal => "normal",
            CorpusVariant::Diacritics => "diacritics",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for CorpusVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable, canonically ordered verse collection
#[derive(Debug)]
pub struct Corpus {
    variant: CorpusVariant,
    records: Vec<VerseRecord>,
}

impl Corpus {
    pub fn new(variant: CorpusVariant, records: Vec<VerseRecord>) -> Self {
        Self { variant, records }
    }

    /// Parse a JSON array of verse records, rejecting out-of-range numbering
    pub fn from_json(variant: CorpusVariant, json: &str) -> Result<Self> {
        let records: Vec<VerseRecord> = serde_json::from_str(json)
            .with_context(|| format!("Failed to parse {} corpus", variant))?;

        for (idx, record) in records.iter().enumerate() {
            if record.snum == 0 || record.snum > SURAH_COUNT {
                bail!(
                    "record {} has surah number {} outside 1..={}",
                    idx,
                    record.snum,
                    SURAH_COUNT
                );
            }
            if record.anum == 0 {
                bail!("record {} ({}) has verse number 0", idx, record.surah);
            }
        }

        Ok(Self::new(variant, records))
    }

    pub fn variant(&self) -> CorpusVariant {
        self.variant
    }

    pub fn records(&self) -> &[VerseRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&VerseRecord> {
        self.records.get(idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a verse by (surah, verse) number
    pub fn find(&self, snum: u32, anum: u32) -> Option<&VerseRecord> {
        self.records.iter().find(|r| r.snum == snum && r.anum == anum)
    }
}

/// Holds both corpus variants, each loaded at most once from `<data_dir>/<variant>.json`
pub struct CorpusStore {
    data_dir: PathBuf,
    normal: OnceCell<Arc<Corpus>>,
    diacritics: OnceCell<Arc<Corpus>>,
}

impl CorpusStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            normal: OnceCell::new(),
            diacritics: OnceCell::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn cell(&self, variant: CorpusVariant) -> &OnceCell<Arc<Corpus>> {
        match variant {
            CorpusVariant::Normal => &self.normal,
            CorpusVariant::Diacritics => &self.diacritics,
        }
    }

    /// The corpus if it has been loaded, without waiting
    pub fn get(&self, variant: CorpusVariant) -> Option<Arc<Corpus>> {
        self.cell(variant).get().cloned()
    }

    /// Like `get`, but reports a missing corpus as `CorpusNotReady`
    pub fn require(&self, variant: CorpusVariant) -> std::result::Result<Arc<Corpus>, AyatError> {
        self.get(variant).ok_or_else(|| {
            AyatError::CorpusNotReady(format!("{} corpus has not been loaded yet", variant))
        })
    }

    /// Install an already-parsed corpus
    pub fn insert(&self, corpus: Corpus) -> std::result::Result<Arc<Corpus>, AyatError> {
        let variant = corpus.variant();
        let corpus = Arc::new(corpus);
        self.cell(variant)
            .set(Arc::clone(&corpus))
            .map_err(|_| AyatError::Other(format!("{} corpus is already loaded", variant)))?;
        Ok(corpus)
    }

    /// Load the corpus from disk on first use; concurrent callers share one read
    pub async fn load(&self, variant: CorpusVariant) -> Result<Arc<Corpus>> {
        let path = self.data_dir.join(variant.file_name());
        let corpus = self
            .cell(variant)
            .get_or_try_init(|| async {
                let start = std::time::Instant::now();
                let json = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read corpus at {:?}", path))?;
                let corpus = Corpus::from_json(variant, &json)?;
                tracing::info!(
                    variant = %variant,
                    verses = corpus.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "corpus loaded"
                );
                Ok::<_, anyhow::Error>(Arc::new(corpus))
            })
            .await?;
        Ok(Arc::clone(corpus))
    }

    /// Verse count per loaded variant
    pub fn status(&self) -> Vec<(CorpusVariant, Option<usize>)> {
        CorpusVariant::ALL
            .iter()
            .map(|&v| (v, self.get(v).map(|c| c.len())))
            .collect()
    }
}
