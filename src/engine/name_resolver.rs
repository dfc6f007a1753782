// ==========================================
// Price Catalog - Name resolver
// ==========================================
// Fills blank product names from the historical name cache.
// Miss -> "[<raw article>]" placeholder so curators can find it.
// The cache is read-only here; populating it is someone else's job.
// ==========================================

use crate::domain::product::ProductRecord;
use crate::domain::types::normalize_article;
use std::collections::HashMap;

// ==========================================
// NameCache - run-scoped snapshot
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameCache {
    names: HashMap<String, String>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys are normalized to the canonical article; blank entries are dropped
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let names = pairs
            .into_iter()
            .filter_map(|(k, v)| {
                let key = normalize_article(k.as_ref());
                let name = v.as_ref().trim();
                if key.is_empty() || name.is_empty() {
                    None
                } else {
                    Some((key, name.to_string()))
                }
            })
            .collect();
        Self { names }
    }

    pub fn get(&self, article: &str) -> Option<&str> {
        self.names.get(article).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameResolution {
    /// The feed supplied a name; nothing changed
    Source,
    CacheHit,
    Placeholder,
}

// ==========================================
// NameResolver
// ==========================================
pub struct NameResolver<'a> {
    cache: &'a NameCache,
    hits: usize,
    misses: usize,
}

impl<'a> NameResolver<'a> {
    pub fn new(cache: &'a NameCache) -> Self {
        Self {
            cache,
            hits: 0,
            misses: 0,
        }
    }

    /// Never overwrites a name the feed already supplied.
    pub fn resolve(&mut self, record: &mut ProductRecord) -> NameResolution {
        if record.has_name() {
            return NameResolution::Source;
        }

        match self.cache.get(&record.article) {
            Some(name) => {
                record.name = name.to_string();
                self.hits += 1;
                NameResolution::CacheHit
            }
            None => {
                record.name = placeholder_name(&record.raw_article);
                self.misses += 1;
                NameResolution::Placeholder
            }
        }
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

pub fn placeholder_name(raw_article: &str) -> String {
    format!("[{}]", raw_article.trim())
}
