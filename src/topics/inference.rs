// NMF topic inference — the core routine.
//
//   text → lemmatize → TF-IDF row → NMF weights → drop skipped topic
//        → normalize → rank → top N
//
// Weights come back unnormalized from the NMF transform. A document with no
// vocabulary hits (including empty text) gets an all-zero weight vector, so
// normalization is guarded: every likelihood is 0.0 and topics are listed in
// index order.

use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use super::traits::{DocumentTopics, TopicScore, TopicScorer};
use crate::model::TopicModel;

/// Scorer backed by the pretrained lemmatizer + TF-IDF + NMF pipeline.
#[derive(Debug, Clone)]
pub struct NmfTopicScorer {
    model: Arc<TopicModel>,
    /// How many topics to emit per document
    pub num_topic_display: usize,
    /// Topic whose mass is dropped before normalization
    pub skipped_topic: Option<usize>,
}

impl NmfTopicScorer {
    pub fn new(
        model: Arc<TopicModel>,
        num_topic_display: usize,
        skipped_topic: Option<usize>,
    ) -> Self {
        Self {
            model,
            num_topic_display,
            skipped_topic,
        }
    }

    pub fn model(&self) -> &TopicModel {
        &self.model
    }
}

impl TopicScorer for NmfTopicScorer {
    fn score(&self, text: &str) -> Result<DocumentTopics> {
        let lemmatized = self.model.lemmatizer.lemmatize(text);
        let row = self.model.vectorizer.transform(&lemmatized.text);
        let weights = self.model.nmf.transform(&row)?;

        debug!(
            tokens = lemmatized.token_count,
            terms = row.len(),
            "Scored document"
        );

        let topics = rank_topics(&weights, self.skipped_topic, self.num_topic_display)
            .into_iter()
            .map(|(topic_id, likelihood)| TopicScore {
                topic_id,
                label: self.model.labels[topic_id].clone(),
                likelihood,
            })
            .collect();

        Ok(DocumentTopics {
            start: lemmatized.start,
            end: lemmatized.end,
            topics,
        })
    }
}

/// Zero the skipped topic, normalize to a distribution and return the top
/// `n` (topic, likelihood) pairs, highest first.
///
/// The skipped topic never appears in the output. Ties (including the
/// all-zero case) go to the higher topic index, the same rule topic labels
/// use for their terms. When the model has fewer
/// than `n` other topics, all of them are returned.
pub fn rank_topics(weights: &[f64], skipped: Option<usize>, n: usize) -> Vec<(usize, f64)> {
    let mut weights: Vec<f64> = weights
        .iter()
        .map(|w| if w.is_finite() && *w > 0.0 { *w } else { 0.0 })
        .collect();
    if let Some(skip) = skipped {
        if let Some(w) = weights.get_mut(skip) {
            *w = 0.0;
        }
    }

    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        for w in &mut weights {
            *w /= total;
        }
    }

    let mut order: Vec<usize> = (0..weights.len())
        .filter(|&i| Some(i) != skipped)
        .collect();
    order.sort_by(|&a, &b| {
        weights[b]
            .partial_cmp(&weights[a])
            .unwrap_or(Ordering::Equal)
            .then(b.cmp(&a))
    });

    order
        .into_iter()
        .take(n)
        .map(|i| (i, weights[i]))
        .collect()
}
