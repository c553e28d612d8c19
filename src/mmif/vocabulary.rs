// Type URIs used by this app.

/// MMIF version the output views conform to.
pub const MMIF_VERSION: &str = "0.4.0";

/// Annotation type for topic annotations.
pub const TOPIC: &str = "http://vocab.lappsgrid.org/Topic";

/// Short name that text document type URIs end with, across MMIF versions.
pub const TEXT_DOCUMENT: &str = "TextDocument";

/// Full text document type URI for the supported MMIF version.
pub fn text_document_uri() -> String {
    format!("http://mmif.clams.ai/{MMIF_VERSION}/vocabulary/{TEXT_DOCUMENT}")
}

/// Whether an `@type` names a text document, whatever vocabulary version it
/// uses (`.../0.4.0/vocabulary/TextDocument` or `.../vocabulary/TextDocument/v1`).
pub fn is_text_document(at_type: &str) -> bool {
    let at_type = at_type.trim_end_matches('/');
    let unversioned = match at_type.rsplit_once('/') {
        Some((head, tail)) if is_version_segment(tail) => head,
        _ => at_type,
    };
    unversioned.ends_with(TEXT_DOCUMENT)
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}
