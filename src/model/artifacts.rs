// Model artifact discovery.
//
// The pretrained pipeline ships as a directory of JSON exports:
//   nmf.json                  — NMF components and transform settings
//   tfidf_vectorizer.json     — fitted vocabulary, idf weights, analyzer settings
//   lemmatizer.json           — lemma lookup table, suffix rules, known lemmas
//   tfidf_feature_names.json  — optional explicit feature-name list
//
// Lookup order for the directory: TOPICS_MODEL_DIR, then ./nmf-model when it
// exists, then the platform data dir (~/.local/share/topic-annotator/nmf-model).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

pub const NMF_FILE: &str = "nmf.json";
pub const TFIDF_FILE: &str = "tfidf_vectorizer.json";
pub const LEMMATIZER_FILE: &str = "lemmatizer.json";
pub const FEATURE_NAMES_FILE: &str = "tfidf_feature_names.json";

const REQUIRED_FILES: [&str; 3] = [NMF_FILE, TFIDF_FILE, LEMMATIZER_FILE];

/// Name of the model directory relative to the working directory.
pub const LOCAL_MODEL_DIR: &str = "nmf-model";

/// Returns the default directory for model artifacts.
pub fn default_model_dir() -> PathBuf {
    let local = PathBuf::from(LOCAL_MODEL_DIR);
    if local.is_dir() {
        return local;
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("topic-annotator")
        .join(LOCAL_MODEL_DIR)
}

/// Required artifact files that don't exist in `dir`.
pub fn missing_model_files(dir: &Path) -> Vec<&'static str> {
    REQUIRED_FILES
        .iter()
        .copied()
        .filter(|name| !dir.join(name).exists())
        .collect()
}

/// Check whether every required artifact exists.
pub fn model_files_present(dir: &Path) -> bool {
    missing_model_files(dir).is_empty()
}

/// Read and deserialize a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Malformed model artifact {}", path.display()))
}
