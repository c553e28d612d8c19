// Shared fixtures: a six-term, three-topic model small enough to reason
// about by hand, and an in-memory text source.
//
//   topic 0  cat dog (fish)      pets
//   topic 1  car road engine     traffic
//   topic 2  fish (road)         the one usually skipped

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use topic_annotator::model::nmf::{NmfArtifact, NmfModel, Solver};
use topic_annotator::model::tfidf::{Norm, TfidfArtifact, TfidfVectorizer, DEFAULT_TOKEN_PATTERN};
use topic_annotator::model::TopicModel;
use topic_annotator::nlp::lemmatizer::{Lemmatizer, LemmatizerArtifact};
use topic_annotator::pipeline::annotate::Annotator;
use topic_annotator::text::TextSource;
use topic_annotator::topics::inference::NmfTopicScorer;

pub const VOCAB: [&str; 6] = ["cat", "dog", "fish", "car", "road", "engine"];

pub const TEXT_DOCUMENT: &str = "http://mmif.clams.ai/vocabulary/TextDocument/v1";

pub fn lemmatizer() -> Lemmatizer {
    let lookup = [("cats", "cat"), ("dogs", "dog"), ("mice", "mouse")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Lemmatizer::from_artifact(LemmatizerArtifact {
        lookup,
        rules: vec![("s".to_string(), String::new())],
        index: VOCAB.iter().map(|w| w.to_string()).collect(),
    })
    .unwrap()
}

pub fn tfidf_artifact() -> TfidfArtifact {
    TfidfArtifact {
        vocabulary: VOCAB
            .iter()
            .enumerate()
            .map(|(i, w)| (w.to_string(), i))
            .collect(),
        idf: vec![1.0; VOCAB.len()],
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

pub fn nmf_artifact() -> NmfArtifact {
    NmfArtifact {
        components: vec![
            vec![1.0, 1.0, 0.5, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.2, 0.0],
        ],
        solver: Solver::Cd,
        alpha_w: 0.0,
        l1_ratio: 0.0,
        max_iter: 500,
        tol: 1e-6,
    }
}

pub fn model() -> Arc<TopicModel> {
    let model = TopicModel::from_parts(
        lemmatizer(),
        TfidfVectorizer::from_artifact(tfidf_artifact()).unwrap(),
        NmfModel::from_artifact(nmf_artifact()).unwrap(),
        None,
        2,
    )
    .unwrap();
    Arc::new(model)
}

pub fn scorer(num_topic_display: usize, skipped_topic: Option<usize>) -> NmfTopicScorer {
    NmfTopicScorer::new(model(), num_topic_display, skipped_topic)
}

/// Text keyed by location; unknown locations are an error.
#[derive(Default)]
pub struct MapSource {
    pub texts: HashMap<String, String>,
}

impl MapSource {
    pub fn with(mut self, location: &str, text: &str) -> Self {
        self.texts.insert(location.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl TextSource for MapSource {
    async fn fetch(&self, location: &str) -> Result<String> {
        self.texts
            .get(location)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such location {location}"))
    }
}

/// Two topics shown, topic 2 skipped.
pub fn annotator(source: MapSource) -> Annotator {
    Annotator::new(Arc::new(scorer(2, Some(2))), Arc::new(source))
}

pub fn text_doc(id: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "@type": TEXT_DOCUMENT,
        "properties": {"id": id, "text": {"@value": text, "@language": "en"}}
    })
}
