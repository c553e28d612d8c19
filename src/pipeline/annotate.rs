// MMIF annotation — runs topic inference over every text document in a
// container and appends the results as new views.
//
// Two kinds of text document get annotated:
//   1. top-level documents — one new view per document, with the document
//      recorded once in the view's `contains` metadata
//   2. text documents produced inside earlier views (e.g. transcripts) — one
//      shared new view for each such source view, each annotation naming its
//      document as "<view id>:<document id>"

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::mmif::identifiers::Identifiers;
use crate::mmif::metadata::AppMetadata;
use crate::mmif::vocabulary::TOPIC;
use crate::mmif::{Annotation, Mmif, View};
use crate::text::{read_text, TextSource};
use crate::topics::traits::{DocumentTopics, TopicScorer};

/// Prefix for topic annotation ids.
const TOPIC_ID_PREFIX: &str = "tp";

/// Annotates MMIF containers with document topics.
#[derive(Clone)]
pub struct Annotator {
    scorer: Arc<dyn TopicScorer>,
    text_source: Arc<dyn TextSource>,
    metadata: AppMetadata,
}

impl Annotator {
    pub fn new(scorer: Arc<dyn TopicScorer>, text_source: Arc<dyn TextSource>) -> Self {
        Self {
            scorer,
            text_source,
            metadata: AppMetadata::topic_modeling(),
        }
    }

    pub fn metadata(&self) -> &AppMetadata {
        &self.metadata
    }

    /// Annotate a serialized container and serialize the result.
    pub async fn annotate_json(&self, raw: &str, pretty: bool) -> Result<String> {
        let mmif = Mmif::from_json(raw)?;
        self.annotate(mmif).await?.to_json(pretty)
    }

    /// Append topic views to `mmif` and return it.
    pub async fn annotate(&self, mut mmif: Mmif) -> Result<Mmif> {
        let mut ids = Identifiers::new();
        let app = self.metadata.identifier.clone();

        // Snapshot the work before adding views so new views aren't rescanned.
        let top_level: Vec<Annotation> = mmif.text_documents().cloned().collect();
        let nested: Vec<(String, Vec<Annotation>)> = mmif
            .views
            .iter()
            .map(|view| {
                let docs: Vec<Annotation> = mmif
                    .documents_in_view(&view.id)
                    .into_iter()
                    .cloned()
                    .collect();
                (view.id.clone(), docs)
            })
            .filter(|(_, docs)| !docs.is_empty())
            .collect();

        for doc in &top_level {
            let topics = self.score_document(doc).await?;
            let view = mmif.new_view(&app);
            view.new_contain(TOPIC, Some(doc.id()));
            add_topic_annotations(view, &mut ids, None, &topics);
        }

        for (view_id, docs) in &nested {
            let mut scored = Vec::with_capacity(docs.len());
            for doc in docs {
                scored.push((doc.id(), self.score_document(doc).await?));
            }

            let view = mmif.new_view(&app);
            view.new_contain(TOPIC, None);
            for (doc_id, topics) in &scored {
                let qualified = format!("{view_id}:{doc_id}");
                add_topic_annotations(view, &mut ids, Some(&qualified), topics);
            }
        }

        info!(
            documents = top_level.len(),
            nested_documents = nested.iter().map(|(_, d)| d.len()).sum::<usize>(),
            "Annotated MMIF"
        );
        Ok(mmif)
    }

    async fn score_document(&self, doc: &Annotation) -> Result<DocumentTopics> {
        let text = read_text(doc, self.text_source.as_ref())
            .await
            .with_context(|| format!("Failed to read text of document {:?}", doc.id()))?;
        debug!(document = doc.id(), chars = text.chars().count(), "Scoring document");

        // Inference is CPU-bound; keep it off the async workers.
        let scorer = Arc::clone(&self.scorer);
        tokio::task::spawn_blocking(move || scorer.score(&text))
            .await
            .context("Topic inference task panicked")?
            .with_context(|| format!("Topic inference failed for document {:?}", doc.id()))
    }
}

/// One annotation per ranked topic.
fn add_topic_annotations(
    view: &mut View,
    ids: &mut Identifiers,
    doc_id: Option<&str>,
    topics: &DocumentTopics,
) {
    for topic in &topics.topics {
        let ann = view.new_annotation(TOPIC, ids.next(TOPIC_ID_PREFIX));
        if let Some(doc_id) = doc_id {
            ann.add_property("document", doc_id);
        }
        ann.add_property("start", topics.start);
        ann.add_property("end", topics.end);
        ann.add_property("topic_id", topic.topic_id);
        ann.add_property("topic", topic.label.as_str());
        ann.add_property("likelihood", topic.likelihood);
    }
}
