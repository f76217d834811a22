//! Synonym expansion for catalog search terms.
//!
//! Catalog rows are matched by substring, so a shopper asking for a "couch"
//! must also hit rows labeled "sofa". The table below maps each canonical
//! term to its aliases; lookups are symmetric (querying an alias returns the
//! whole set) and always include the queried term itself, so expansion never
//! loses the original word.
//!
//! Free-text expansion produces an explicit bag of terms attached to the
//! normalized query instead of splicing synonyms into the text, which keeps
//! the original text intact and avoids false substring matches across
//! spliced word boundaries.

use ahash::AHashMap;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Canonical term → aliases. Matching is case-insensitive; multi-word terms
/// are matched as whole phrases by substring.
const SYNONYM_TABLE: &[(&str, &[&str])] = &[
    ("sofa", &["couch", "settee", "lounger", "sofa set"]),
    (
        "tv unit",
        &["tv cabinet", "tv console", "tv stand", "entertainment unit", "media unit"],
    ),
    ("wardrobe", &["almirah", "cupboard", "closet"]),
    ("bed", &["cot", "bed frame"]),
    ("coffee table", &["center table", "centre table"]),
    ("dining table", &["dining set", "dinner table"]),
    ("study table", &["desk", "writing table", "work table"]),
    ("bookshelf", &["bookcase", "book rack", "book shelf"]),
    ("shoe rack", &["shoe cabinet", "footwear rack"]),
    ("recliner", &["easy chair", "lounge chair"]),
    ("curtains", &["drapes", "drapery"]),
    ("rug", &["carpet", "floor mat"]),
    ("chest of drawers", &["dresser", "drawer unit"]),
];

/// Phrases that trigger TV-unit expansion without being synonyms of it.
const TV_TABLE_TRIGGERS: &[&str] = &["tv table", "tv-table"];

/// Reverse index: every term in the table (canonical or alias) → its row.
static TERM_INDEX: LazyLock<AHashMap<&'static str, usize>> = LazyLock::new(|| {
    let mut index = AHashMap::new();
    for (row, (canonical, aliases)) in SYNONYM_TABLE.iter().enumerate() {
        index.insert(*canonical, row);
        for alias in *aliases {
            index.insert(*alias, row);
        }
    }
    index
});

/// All terms of a table row, canonical first.
fn row_terms(row: usize) -> impl Iterator<Item = &'static str> {
    let (canonical, aliases) = SYNONYM_TABLE[row];
    std::iter::once(canonical).chain(aliases.iter().copied())
}

/// Look up the synonym set for a term.
///
/// The lowercased input is always the first entry, even when the table has
/// no row for it; the rest of its row (if any) follows in table order with
/// duplicates removed.
pub fn synonyms(token: &str) -> Vec<String> {
    let token = token.trim().to_lowercase();
    let mut out = vec![token.clone()];
    if let Some(&row) = TERM_INDEX.get(token.as_str()) {
        for term in row_terms(row) {
            if term != token {
                out.push(term.to_owned());
            }
        }
    }
    out
}

/// Union of the synonym sets of every keyword.
pub fn expand_keywords<I, S>(keywords: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = BTreeSet::new();
    for keyword in keywords {
        out.extend(synonyms(keyword.as_ref()));
    }
    out
}

/// A normalized free-text query with its expanded term bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedQuery {
    /// The input, unicode-normalized and lowercased. Never rewritten beyond
    /// that — expansion lives in `terms`.
    pub text: String,
    terms: BTreeSet<String>,
}

impl ExpandedQuery {
    /// The expanded synonym terms, sorted.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Substring test against the normalized text or any expanded term.
    /// `haystack` is lowercased before testing.
    pub fn matches(&self, haystack: &str) -> bool {
        let haystack = haystack.to_lowercase();
        haystack.contains(&self.text) || self.terms.iter().any(|t| haystack.contains(t))
    }
}

/// Expand free text into an [`ExpandedQuery`].
///
/// Normalizes unicode hyphens and curly quotes to their plain forms and
/// lowercases. Every synonym-table phrase found in the normalized text
/// contributes its whole row to the term bag; "tv table" / "tv-table"
/// additionally pull in the TV-unit row even though neither is a synonym of
/// it.
pub fn expand_query(text: &str) -> ExpandedQuery {
    let text = normalize_text(text);
    let mut terms = BTreeSet::new();

    for (row, (canonical, aliases)) in SYNONYM_TABLE.iter().enumerate() {
        let hit = text.contains(canonical) || aliases.iter().any(|a| text.contains(a));
        if hit {
            terms.extend(row_terms(row).map(str::to_owned));
        }
    }

    if TV_TABLE_TRIGGERS.iter().any(|t| text.contains(t))
        && let Some(&row) = TERM_INDEX.get("tv unit")
    {
        terms.extend(row_terms(row).map(str::to_owned));
    }

    ExpandedQuery { text, terms }
}

/// Replace unicode dash variants and curly quotes with plain characters,
/// then lowercase.
fn normalize_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            '\u{00a0}' => ' ',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}
