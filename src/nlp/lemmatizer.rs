// Lookup + rule lemmatizer.
//
// Lemmas come from the pretrained pipeline's exported tables:
//   1. `lookup` — exact form → lemma (irregular forms, clitics, pronouns)
//   2. `rules`  — suffix rewrites, accepted only when the rewritten form is a
//                 known lemma in `index` (so "houses" → "house" but "bus"
//                 doesn't become "bu")
//   3. fallback — the lowercased form
// Whitespace and punctuation tokens pass through unchanged.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::tokenizer::{tokenize, Token};
use crate::model::artifacts::read_json;

/// On-disk form of `lemmatizer.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LemmatizerArtifact {
    #[serde(default)]
    pub lookup: HashMap<String, String>,
    /// (suffix, replacement) pairs, tried in order
    #[serde(default)]
    pub rules: Vec<(String, String)>,
    #[serde(default)]
    pub index: Vec<String>,
}

/// Result of lemmatizing a document.
#[derive(Debug, Clone, PartialEq)]
pub struct LemmatizedText {
    /// Lemmas joined by single spaces, paragraph breaks preserved
    pub text: String,
    /// Character offset of the first token in the source text
    pub start: usize,
    /// Character offset just past the last token in the source text
    pub end: usize,
    pub token_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Lemmatizer {
    lookup: HashMap<String, String>,
    rules: Vec<(String, String)>,
    index: HashSet<String>,
}

impl Lemmatizer {
    /// Load lemma tables from `lemmatizer.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let artifact: LemmatizerArtifact = read_json(path)?;
        Self::from_artifact(artifact)
            .with_context(|| format!("Invalid lemmatizer artifact {}", path.display()))
    }

    pub fn from_artifact(artifact: LemmatizerArtifact) -> Result<Self> {
        if let Some((_, replacement)) = artifact.rules.iter().find(|(s, _)| s.is_empty()) {
            anyhow::bail!("suffix rule rewriting to {replacement:?} has an empty suffix");
        }
        Ok(Self {
            lookup: artifact.lookup,
            rules: artifact.rules,
            index: artifact.index.into_iter().collect(),
        })
    }

    /// Lemma for a single token.
    pub fn lemma(&self, token: &Token) -> String {
        if !token.is_word() {
            return token.text.clone();
        }
        if let Some(lemma) = self.lookup.get(&token.text) {
            return lemma.clone();
        }
        let lower = token.text.to_lowercase();
        if let Some(lemma) = self.lookup.get(&lower) {
            return lemma.clone();
        }

        for (suffix, replacement) in &self.rules {
            if let Some(stem) = lower.strip_suffix(suffix.as_str()) {
                if stem.is_empty() {
                    continue;
                }
                let candidate = format!("{stem}{replacement}");
                if self.index.contains(&candidate) {
                    return candidate;
                }
            }
        }

        lower
    }

    /// Lemmatize a document, tracking the span the tokens cover.
    pub fn lemmatize(&self, text: &str) -> LemmatizedText {
        let tokens = tokenize(text);
        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
            return LemmatizedText {
                text: String::new(),
                start: 0,
                end: 0,
                token_count: 0,
            };
        };
        let (start, end) = (first.start, last.end);

        let lemmas: Vec<String> = tokens.iter().map(|t| self.lemma(t)).collect();
        let joined = lemmas.join(" ").replace(" \n\n ", "\n\n");

        LemmatizedText {
            text: joined,
            start,
            end,
            token_count: tokens.len(),
        }
    }
}
