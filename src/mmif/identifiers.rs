// Annotation identifier generator.
//
// Ids are a prefix plus a per-prefix counter: tp1, tp2, ... One generator
// lives for one annotate() call, so numbering restarts with every request.
// It only guarantees uniqueness among the annotations it hands ids to; it
// doesn't look at ids already present in the container.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Identifiers {
    counters: HashMap<String, usize>,
}

impl Identifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for `prefix`.
    pub fn next(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{prefix}{counter}")
    }

    pub fn reset(&mut self) {
        self.counters.clear();
    }
}
