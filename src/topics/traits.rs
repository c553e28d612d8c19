// Topic scorer trait — swap-ready abstraction.
//
// The annotation pipeline only needs "text in, ranked topics out". The
// default implementation runs the pretrained NMF pipeline; tests and
// alternative models plug in here without touching the MMIF handling.

use anyhow::Result;
use serde::Serialize;

/// One ranked topic for a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicScore {
    /// Stable index of the topic in the model
    pub topic_id: usize,
    /// The topic's top terms
    pub label: String,
    /// Share of the document's (renormalized) topic mass, 0.0 to 1.0
    pub likelihood: f64,
}

/// Ranked topics plus the character span of the text they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentTopics {
    pub start: usize,
    pub end: usize,
    /// Highest likelihood first
    pub topics: Vec<TopicScore>,
}

/// Trait for scoring a document's topics.
pub trait TopicScorer: Send + Sync {
    /// Rank the topics of a single document.
    fn score(&self, text: &str) -> Result<DocumentTopics>;
}
