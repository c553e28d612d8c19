// Unit tests for the pretrained model: artifact loading, consistency
// checks between the parts, labels, and the NMF solvers.

mod common;

use std::path::PathBuf;

use serde_json::json;

use topic_annotator::model::artifacts::{missing_model_files, model_files_present};
use topic_annotator::model::nmf::{NmfModel, Solver};
use topic_annotator::model::tfidf::TfidfVectorizer;
use topic_annotator::model::TopicModel;

fn model_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("topic-annotator-model-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_artifacts(dir: &std::path::Path) {
    let vocabulary: serde_json::Map<String, serde_json::Value> = common::VOCAB
        .iter()
        .enumerate()
        .map(|(i, w)| (w.to_string(), json!(i)))
        .collect();

    std::fs::write(
        dir.join("tfidf_vectorizer.json"),
        json!({"vocabulary": vocabulary, "idf": [1.0, 1.0, 1.0, 1.0, 1.0, 1.0]}).to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.join("nmf.json"),
        json!({"components": common::nmf_artifact().components, "solver": "cd"}).to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.join("lemmatizer.json"),
        json!({
            "lookup": {"cats": "cat"},
            "rules": [["s", ""]],
            "index": common::VOCAB
        })
        .to_string(),
    )
    .unwrap();
}

// ============================================================
// Loading from disk
// ============================================================

#[test]
fn load_reads_every_artifact() {
    let dir = model_dir("load");
    write_artifacts(&dir);
    assert!(model_files_present(&dir));

    let model = TopicModel::load(&dir, 3).unwrap();
    assert_eq!(model.n_topics(), 3);
    assert_eq!(model.labels[0], "dog cat fish");
    assert_eq!(model.labels[1], "engine road car");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn feature_names_file_overrides_vocabulary_labels() {
    let dir = model_dir("names");
    write_artifacts(&dir);
    std::fs::write(
        dir.join("tfidf_feature_names.json"),
        json!(["Cat", "Dog", "Fish", "Car", "Road", "Engine"]).to_string(),
    )
    .unwrap();

    let model = TopicModel::load(&dir, 1).unwrap();
    assert_eq!(model.labels, vec!["Dog", "Engine", "Fish"]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_artifacts_are_listed() {
    let dir = model_dir("missing");
    std::fs::write(dir.join("nmf.json"), "{}").unwrap();

    let missing = missing_model_files(&dir);
    assert!(missing.contains(&"tfidf_vectorizer.json"));
    assert!(missing.contains(&"lemmatizer.json"));
    assert!(!missing.contains(&"nmf.json"));
    assert!(TopicModel::load(&dir, 10).is_err());

    std::fs::remove_dir_all(&dir).unwrap();
}

// ============================================================
// Consistency between parts
// ============================================================

#[test]
fn mismatched_feature_counts_are_rejected() {
    let mut tfidf = common::tfidf_artifact();
    tfidf.vocabulary.remove("engine");
    tfidf.idf.pop();

    let result = TopicModel::from_parts(
        common::lemmatizer(),
        TfidfVectorizer::from_artifact(tfidf).unwrap(),
        NmfModel::from_artifact(common::nmf_artifact()).unwrap(),
        None,
        10,
    );
    assert!(result.is_err());
}

#[test]
fn wrong_length_feature_names_fall_back_to_vocabulary() {
    let model = TopicModel::from_parts(
        common::lemmatizer(),
        TfidfVectorizer::from_artifact(common::tfidf_artifact()).unwrap(),
        NmfModel::from_artifact(common::nmf_artifact()).unwrap(),
        Some(vec!["only".to_string(), "two".to_string()]),
        1,
    )
    .unwrap();
    assert_eq!(model.labels, vec!["dog", "engine", "fish"]);
}

#[test]
fn ragged_components_are_rejected() {
    let mut nmf = common::nmf_artifact();
    nmf.components[1].pop();
    assert!(NmfModel::from_artifact(nmf).is_err());
}

// ============================================================
// NMF solvers
// ============================================================

#[test]
fn solvers_agree_on_orthogonal_topics() {
    let vectorizer = TfidfVectorizer::from_artifact(common::tfidf_artifact()).unwrap();
    let row = vectorizer.transform("cat dog car");

    let cd = NmfModel::from_artifact(common::nmf_artifact()).unwrap();
    let mut mu_artifact = common::nmf_artifact();
    mu_artifact.solver = Solver::Mu;
    mu_artifact.max_iter = 2000;
    mu_artifact.tol = 1e-10;
    let mu = NmfModel::from_artifact(mu_artifact).unwrap();

    let w_cd = cd.transform(&row).unwrap();
    let w_mu = mu.transform(&row).unwrap();

    assert!(w_cd.iter().all(|w| *w >= 0.0));
    assert!(w_mu.iter().all(|w| *w >= 0.0));
    // Least-squares weights for topics 0 and 1; topic 2 pushed to zero.
    let expected = [2.0 / (3f64.sqrt() * 2.25), 1.0 / (3f64.sqrt() * 3.0)];
    for (t, want) in expected.iter().enumerate() {
        assert!((w_cd[t] - want).abs() < 1e-4, "cd topic {t}: {}", w_cd[t]);
        assert!((w_mu[t] - want).abs() < 1e-2, "mu topic {t}: {}", w_mu[t]);
    }
    assert!(w_cd[2] < 1e-9);
}

#[test]
fn empty_row_gives_zero_weights() {
    let nmf = NmfModel::from_artifact(common::nmf_artifact()).unwrap();
    let weights = nmf.transform(&Vec::new()).unwrap();
    assert_eq!(weights, vec![0.0, 0.0, 0.0]);
}

#[test]
fn row_outside_feature_space_is_an_error() {
    let nmf = NmfModel::from_artifact(common::nmf_artifact()).unwrap();
    assert!(nmf.transform(&vec![(42, 1.0)]).is_err());
}
