// Annotation pipeline — MMIF in, MMIF with topic views out, one container
// at a time or a directory at a time.

pub mod annotate;
pub mod batch;
