// TF-IDF vectorizer with a fixed, pretrained vocabulary.
//
// Nothing is fitted here. The artifact carries the vocabulary, the idf
// weights and the analyzer settings the vectorizer was fitted with, and
// `transform` reproduces that analyzer exactly: preprocess → token pattern →
// stop words → n-grams → counts → tf scaling → idf → row normalization.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use super::artifacts::read_json;
use super::stop_words::ENGLISH_STOP_WORDS;

/// Default token pattern: words of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// A sparse row: (column, value) pairs in ascending column order.
pub type SparseRow = Vec<(usize, f64)>;

/// Row normalization applied after idf weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Stop words as exported: a named built-in list or an explicit list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StopWords {
    Named(String),
    List(Vec<String>),
}

/// On-disk form of `tfidf_vectorizer.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfArtifact {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default)]
    pub stop_words: Option<StopWords>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_true")]
    pub use_idf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Fitted TF-IDF vectorizer, ready for `transform`.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    token_pattern: Regex,
    stop_words: HashSet<String>,
    ngram_range: (usize, usize),
    binary: bool,
    sublinear_tf: bool,
    use_idf: bool,
    norm: Option<Norm>,
}

impl TfidfVectorizer {
    /// Load the vectorizer from `tfidf_vectorizer.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let artifact: TfidfArtifact = read_json(path)?;
        Self::from_artifact(artifact)
            .with_context(|| format!("Invalid TF-IDF artifact {}", path.display()))
    }

    /// Build a vectorizer from an in-memory artifact, validating its shape.
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self> {
        let n_features = artifact.vocabulary.len();
        if n_features == 0 {
            anyhow::bail!("vocabulary is empty");
        }
        if let Some((term, col)) = artifact.vocabulary.iter().find(|(_, c)| **c >= n_features) {
            anyhow::bail!("term {term:?} maps to column {col}, but the vocabulary has {n_features} terms");
        }
        let distinct: HashSet<usize> = artifact.vocabulary.values().copied().collect();
        if distinct.len() != n_features {
            anyhow::bail!("vocabulary maps several terms to the same column");
        }
        if artifact.use_idf && artifact.idf.len() != n_features {
            anyhow::bail!(
                "idf has {} weights but the vocabulary has {n_features} terms",
                artifact.idf.len()
            );
        }
        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            anyhow::bail!("invalid ngram_range ({min_n}, {max_n})");
        }

        let token_pattern = Regex::new(&artifact.token_pattern)
            .with_context(|| format!("invalid token_pattern {:?}", artifact.token_pattern))?;
        if token_pattern.captures_len() > 2 {
            anyhow::bail!("token_pattern may contain at most one capturing group");
        }

        let stop_words = match artifact.stop_words {
            None => HashSet::new(),
            Some(StopWords::List(words)) => words.into_iter().collect(),
            Some(StopWords::Named(name)) if name.eq_ignore_ascii_case("english") => {
                ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect()
            }
            Some(StopWords::Named(name)) => anyhow::bail!("unknown stop word list {name:?}"),
        };

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            lowercase: artifact.lowercase,
            token_pattern,
            stop_words,
            ngram_range: artifact.ngram_range,
            binary: artifact.binary,
            sublinear_tf: artifact.sublinear_tf,
            use_idf: artifact.use_idf,
            norm: artifact.norm,
        })
    }

    /// Number of columns in a transformed row.
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vocabulary terms ordered by column.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![String::new(); self.n_features()];
        for (term, &col) in &self.vocabulary {
            names[col] = term.clone();
        }
        names
    }

    /// Split a document into the analyzer's terms (tokens and n-grams).
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<String> = if self.token_pattern.captures_len() == 2 {
            self.token_pattern
                .captures_iter(&text)
                .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                .collect()
        } else {
            self.token_pattern
                .find_iter(&text)
                .map(|m| m.as_str().to_string())
                .collect()
        };

        let tokens: Vec<String> = tokens
            .into_iter()
            .filter(|t| !self.stop_words.contains(t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        if max_n == 1 {
            return tokens;
        }

        let mut terms = Vec::new();
        if min_n == 1 {
            terms.extend(tokens.iter().cloned());
        }
        let start = min_n.max(2);
        for n in start..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Transform one document into a weighted, normalized sparse row.
    /// Terms outside the vocabulary are dropped.
    pub fn transform(&self, text: &str) -> SparseRow {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseRow = counts.into_iter().collect();
        row.sort_by_key(|&(col, _)| col);

        for (col, value) in &mut row {
            if self.binary {
                *value = 1.0;
            }
            if self.sublinear_tf {
                *value = 1.0 + value.ln();
            }
            if self.use_idf {
                *value *= self.idf[*col];
            }
        }

        match self.norm {
            Some(Norm::L2) => {
                let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
                scale(&mut row, norm);
            }
            Some(Norm::L1) => {
                let norm = row.iter().map(|(_, v)| v.abs()).sum::<f64>();
                scale(&mut row, norm);
            }
            None => {}
        }

        row
    }
}

fn scale(row: &mut SparseRow, norm: f64) {
    if norm > 0.0 {
        for (_, value) in row.iter_mut() {
            *value /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(terms: &[&str]) -> TfidfArtifact {
        TfidfArtifact {
            vocabulary: terms
                .iter()
                .enumerate()
                .map(|(i, t)| (t.to_string(), i))
                .collect(),
            idf: vec![1.0; terms.len()],
            lowercase: true,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            stop_words: None,
            ngram_range: (1, 1),
            binary: false,
            sublinear_tf: false,
            use_idf: true,
            norm: Some(Norm::L2),
        }
    }

    #[test]
    fn test_analyze_drops_single_characters_and_lowercases() {
        let vec = TfidfVectorizer::from_artifact(artifact(&["cat"])).unwrap();
        assert_eq!(vec.analyze("A Cat sat"), vec!["cat", "sat"]);
    }

    #[test]
    fn test_analyze_bigrams() {
        let mut a = artifact(&["cat"]);
        a.ngram_range = (1, 2);
        let vec = TfidfVectorizer::from_artifact(a).unwrap();
        assert_eq!(
            vec.analyze("big cat naps"),
            vec!["big", "cat", "naps", "big cat", "cat naps"]
        );
    }

    #[test]
    fn test_transform_l2_normalizes() {
        let vec = TfidfVectorizer::from_artifact(artifact(&["cat", "dog"])).unwrap();
        let row = vec.transform("cat cat dog");
        let norm: f64 = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert_eq!(row[0].0, 0);
        assert!(row[0].1 > row[1].1);
    }

    #[test]
    fn test_transform_no_hits_is_empty() {
        let vec = TfidfVectorizer::from_artifact(artifact(&["cat"])).unwrap();
        assert!(vec.transform("nothing relevant here").is_empty());
        assert!(vec.transform("").is_empty());
    }

    #[test]
    fn test_from_artifact_rejects_idf_mismatch() {
        let mut a = artifact(&["cat", "dog"]);
        a.idf = vec![1.0];
        assert!(TfidfVectorizer::from_artifact(a).is_err());
    }

    #[test]
    fn test_from_artifact_rejects_out_of_range_column() {
        let mut a = artifact(&["cat"]);
        a.vocabulary.insert("dog".to_string(), 5);
        a.idf = vec![1.0, 1.0];
        assert!(TfidfVectorizer::from_artifact(a).is_err());
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_english_stop_words_keep_ordinary_words() {
        let words = [
            "world", "information", "new", "research", "work", "year", "home", "problem",
            "state", "different", "important", "help",
        ];
        let mut a = artifact(&words);
        a.stop_words = Some(StopWords::Named("English".to_string()));
        let vec = TfidfVectorizer::from_artifact(a).unwrap();

        let text = format!("the {} and", words.join(" "));
        assert_eq!(vec.analyze(&text), words.to_vec());
        assert_eq!(ENGLISH_STOP_WORDS.len(), 318);
    }

    #[test]
    fn test_unknown_stop_word_list_is_rejected() {
        let mut a = artifact(&["cat"]);
        a.stop_words = Some(StopWords::Named("klingon".to_string()));
        assert!(TfidfVectorizer::from_artifact(a).is_err());
    }

    #[test]
    fn test_explicit_stop_word_list_filters_before_ngrams() {
        let mut a = artifact(&["cat"]);
        a.stop_words = Some(StopWords::List(vec!["the".to_string()]));
        a.ngram_range = (2, 2);
        let vec = TfidfVectorizer::from_artifact(a).unwrap();
        assert_eq!(vec.analyze("the cat the dog"), vec!["cat dog"]);
    }

    #[test]
    fn test_capture_group_pattern_keeps_the_group() {
        let mut a = artifact(&["cat"]);
        a.token_pattern = r"(?u)\b(\w+)_x\b".to_string();
        let vec = TfidfVectorizer::from_artifact(a).unwrap();
        assert_eq!(vec.analyze("cat_x dog dog_x"), vec!["cat", "dog"]);
    }

    #[test]
    fn test_binary_counts_each_term_once() {
        let mut a = artifact(&["cat", "dog"]);
        a.binary = true;
        let vec = TfidfVectorizer::from_artifact(a).unwrap();
        let row = vec.transform("cat cat cat dog");
        let expected = 1.0 / 2f64.sqrt();
        assert_eq!(row.len(), 2);
        assert!(close(row[0].1, expected));
        assert!(close(row[1].1, expected));
    }

    #[test]
    fn test_sublinear_tf_uses_one_plus_log() {
        let mut a = artifact(&["cat", "dog"]);
        a.sublinear_tf = true;
        a.norm = None;
        let vec = TfidfVectorizer::from_artifact(a).unwrap();
        let row = vec.transform("cat cat dog");
        assert!(close(row[0].1, 1.0 + 2f64.ln()));
        assert!(close(row[1].1, 1.0));
    }

    #[test]
    fn test_l1_norm_sums_to_one() {
        let mut a = artifact(&["cat", "dog"]);
        a.norm = Some(Norm::L1);
        let vec = TfidfVectorizer::from_artifact(a).unwrap();
        let row = vec.transform("cat cat dog");
        assert!(close(row[0].1, 2.0 / 3.0));
        assert!(close(row[1].1, 1.0 / 3.0));
    }

    #[test]
    fn test_no_norm_keeps_idf_weighted_counts() {
        let mut a = artifact(&["cat", "dog"]);
        a.idf = vec![2.0, 0.5];
        a.norm = None;
        let vec = TfidfVectorizer::from_artifact(a).unwrap();
        assert_eq!(vec.transform("cat cat dog"), vec![(0, 4.0), (1, 0.5)]);
    }

    #[test]
    fn test_without_idf_weights_are_ignored() {
        let mut a = artifact(&["cat", "dog"]);
        a.idf = Vec::new();
        a.use_idf = false;
        a.norm = None;
        let vec = TfidfVectorizer::from_artifact(a).unwrap();
        assert_eq!(vec.transform("dog cat dog"), vec![(0, 1.0), (1, 2.0)]);
    }

    #[test]
    fn test_feature_names_follow_columns() {
        let mut a = artifact(&[]);
        a.vocabulary = [("zebra".to_string(), 0), ("apple".to_string(), 1)].into();
        a.idf = vec![1.0, 1.0];
        let vec = TfidfVectorizer::from_artifact(a).unwrap();
        assert_eq!(vec.feature_names(), vec!["zebra", "apple"]);
    }
}
