// Topic inference — ranked, normalized topics per document.

pub mod inference;
pub mod traits;
