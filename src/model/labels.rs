// Topic labels — each topic is named by its highest-weighted terms.

use std::cmp::Ordering;

/// Label every topic with its `num_top_words` heaviest feature names,
/// heaviest first, joined by single spaces.
///
/// Ties go to the later column, matching a reversed ascending argsort.
pub fn topic_labels(
    components: &[Vec<f64>],
    feature_names: &[String],
    num_top_words: usize,
) -> Vec<String> {
    components
        .iter()
        .map(|weights| {
            let mut order: Vec<usize> = (0..weights.len()).collect();
            order.sort_by(|&a, &b| {
                weights[b]
                    .partial_cmp(&weights[a])
                    .unwrap_or(Ordering::Equal)
                    .then(b.cmp(&a))
            });
            order
                .into_iter()
                .take(num_top_words)
                .filter_map(|i| feature_names.get(i).map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
