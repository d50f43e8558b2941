//! In-memory corpora shared by the unit tests

use crate::corpus::{Corpus, CorpusStore, CorpusVariant, VerseRecord};
use crate::pattern::normal::reorder_marks;

fn record(snum: u32, anum: u32, surah: &str, ayah: &str) -> VerseRecord {
    VerseRecord { ayah: ayah.to_string(), anum, snum, surah: surah.to_string() }
}

/// Uthmani verses; the Uthmani text keeps shadda ahead of the vowel
pub fn normal() -> Corpus {
    let verses = [
        (1, 1, "الفاتحة", "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ"),
        (1, 2, "الفاتحة", "ٱلْحَمْدُ لِلَّهِ رَبِّ ٱلْعَٰلَمِينَ"),
        (2, 255, "البقرة", "ٱللَّهُ لَآ إِلَٰهَ إِلَّا هُوَ ٱلْحَىُّ ٱلْقَيُّومُ"),
        (112, 1, "الإخلاص", "قُلْ هُوَ ٱللَّهُ أَحَدٌ"),
        (112, 2, "الإخلاص", "ٱللَّهُ ٱلصَّمَدُ"),
    ];
    Corpus::new(
        CorpusVariant::Normal,
        verses
            .iter()
            .map(|&(s, a, name, text)| record(s, a, name, &reorder_marks(text)))
            .collect(),
    )
}

/// The same verses in the simple vowelled script
pub fn diacritics() -> Corpus {
    let verses = [
        (1, 1, "الفاتحة", "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ"),
        (1, 2, "الفاتحة", "الْحَمْدُ لِلَّهِ رَبِّ الْعَالَمِينَ"),
        (2, 255, "البقرة", "اللَّهُ لَا إِلَٰهَ إِلَّا هُوَ الْحَيُّ الْقَيُّومُ"),
        (112, 1, "الإخلاص", "قُلْ هُوَ اللَّهُ أَحَدٌ"),
        (112, 2, "الإخلاص", "اللَّهُ الصَّمَدُ"),
    ];
    Corpus::new(
        CorpusVariant::Diacritics,
        verses.iter().map(|&(s, a, name, text)| record(s, a, name, text)).collect(),
    )
}

/// `count` numbered filler verses of surah 2, each containing one match for "قل"
pub fn numbered(count: u32) -> Corpus {
    Corpus::new(
        CorpusVariant::Normal,
        (1..=count).map(|a| record(2, a, "البقرة", "قُلْ نَعَمْ")).collect(),
    )
}

pub fn store() -> CorpusStore {
    let store = CorpusStore::new("unused".into());
    store.insert(normal()).expect("fresh store");
    store.insert(diacritics()).expect("fresh store");
    store
}
