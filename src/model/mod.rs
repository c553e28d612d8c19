// Pretrained model bundle — lemmatizer, TF-IDF vectorizer and NMF components
// loaded once at startup and shared read-only across requests.

pub mod artifacts;
pub mod labels;
pub mod nmf;
pub mod stop_words;
pub mod tfidf;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::nlp::lemmatizer::Lemmatizer;
use artifacts::{read_json, FEATURE_NAMES_FILE, LEMMATIZER_FILE, NMF_FILE, TFIDF_FILE};
use nmf::NmfModel;
use tfidf::TfidfVectorizer;

/// Everything needed to go from raw text to topic weights.
#[derive(Debug, Clone)]
pub struct TopicModel {
    pub lemmatizer: Lemmatizer,
    pub vectorizer: TfidfVectorizer,
    pub nmf: NmfModel,
    /// One human-readable label per topic, indexed by topic id
    pub labels: Vec<String>,
}

impl TopicModel {
    /// Load every artifact from `model_dir`.
    pub fn load(model_dir: &Path, num_top_words: usize) -> Result<Self> {
        let lemmatizer = Lemmatizer::load(&model_dir.join(LEMMATIZER_FILE))?;
        let vectorizer = TfidfVectorizer::load(&model_dir.join(TFIDF_FILE))?;
        let nmf = NmfModel::load(&model_dir.join(NMF_FILE))?;

        let names_path = model_dir.join(FEATURE_NAMES_FILE);
        let feature_names = if names_path.exists() {
            Some(read_json::<Vec<String>>(&names_path)?)
        } else {
            None
        };

        let model = Self::from_parts(lemmatizer, vectorizer, nmf, feature_names, num_top_words)
            .with_context(|| format!("Inconsistent model artifacts in {}", model_dir.display()))?;

        info!(
            topics = model.n_topics(),
            features = model.vectorizer.n_features(),
            dir = %model_dir.display(),
            "Loaded topic model"
        );
        Ok(model)
    }

    /// Assemble a model from already-built parts, checking they agree on
    /// the feature space.
    pub fn from_parts(
        lemmatizer: Lemmatizer,
        vectorizer: TfidfVectorizer,
        nmf: NmfModel,
        feature_names: Option<Vec<String>>,
        num_top_words: usize,
    ) -> Result<Self> {
        if vectorizer.n_features() != nmf.n_features() {
            anyhow::bail!(
                "TF-IDF vocabulary has {} terms but NMF components have {} features",
                vectorizer.n_features(),
                nmf.n_features()
            );
        }

        let feature_names = match feature_names {
            Some(names) if names.len() == nmf.n_features() => names,
            Some(names) => {
                warn!(
                    names = names.len(),
                    features = nmf.n_features(),
                    "Feature name list doesn't match the vocabulary, using vocabulary order"
                );
                vectorizer.feature_names()
            }
            None => vectorizer.feature_names(),
        };

        let labels = labels::topic_labels(nmf.components(), &feature_names, num_top_words);

        Ok(Self {
            lemmatizer,
            vectorizer,
            nmf,
            labels,
        })
    }

    pub fn n_topics(&self) -> usize {
        self.nmf.n_topics()
    }
}
