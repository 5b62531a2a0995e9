// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Ordered header collection with case-insensitive name normalization

use crate::error::{Error, Result};

/// Ordered set of HTTP headers keyed by normalized name
///
/// Names are canonicalized to `Title-Case-With-Hyphens`, so `content-type`,
/// `CONTENT-TYPE` and `Content-Type` all address the same entry. Insertion
/// order is preserved; setting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    /// Create an empty header set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw `"Name: value"` lines
    ///
    /// A line without a `:` separator is a caller programming error and
    /// fails the whole set.
    pub fn parse_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for line in lines {
            let line = line.as_ref();
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| Error::header(line))?;
            set.set(name.trim(), value.trim());
        }
        Ok(set)
    }

    /// Build from name/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut set = Self::new();
        for (name, value) in pairs {
            set.set(name.as_ref(), value.as_ref());
        }
        set
    }

    /// Set a header, replacing any existing value under the same name
    pub fn set(&mut self, name: &str, value: &str) {
        let name = Self::normalize_name(name);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name, value.to_string())),
        }
    }

    /// Get a header value by name (any casing)
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = Self::normalize_name(name);
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge with a lower-priority set
    ///
    /// Entries of `self` win on name collision; non-colliding entries of
    /// `lower` are appended in their original order.
    pub fn merged_over(&self, lower: &HeaderSet) -> HeaderSet {
        let mut merged = self.clone();
        for (name, value) in &lower.entries {
            if merged.get(name).is_none() {
                merged.entries.push((name.clone(), value.clone()));
            }
        }
        merged
    }

    /// Serialize back to `"Name: value"` lines
    pub fn to_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect()
    }

    /// Canonicalize a header name to `Title-Case-With-Hyphens`
    fn normalize_name(name: &str) -> String {
        name.to_lowercase()
            .split('-')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join("-")
    }
}
