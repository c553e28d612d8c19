// Topic annotator: NMF topic modeling over MMIF text documents.
//
// This is the library root. The pipeline runs text through nlp (tokenize,
// lemmatize), model (TF-IDF, NMF) and topics (rank), and mmif/pipeline wrap
// the results into new views on the incoming container.

pub mod config;
pub mod mmif;
pub mod model;
pub mod nlp;
pub mod output;
pub mod pipeline;
pub mod text;
pub mod topics;

#[cfg(feature = "web")]
pub mod web;
