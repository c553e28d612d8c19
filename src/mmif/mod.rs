// MMIF — the JSON interchange container documents arrive in and annotated
// views go back out in.

pub mod container;
pub mod identifiers;
pub mod metadata;
pub mod vocabulary;

pub use container::{Annotation, Mmif, View};
