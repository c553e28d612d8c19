// Route handlers, one file per endpoint.

pub mod annotate;
pub mod metadata;
