// Text preprocessing — tokenization and lemmatization ahead of TF-IDF.

pub mod lemmatizer;
pub mod tokenizer;
