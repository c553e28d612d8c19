// Batch driver — annotate every MMIF file in a directory.
//
// Each `*.json` file in the input directory is annotated either in-process
// or by POSTing it to a running endpoint, and the result is written to the
// output directory under the same file name. A failing file is logged and
// counted; it doesn't stop the rest of the batch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{info, warn};

use super::annotate::Annotator;

/// Where each file gets annotated.
pub enum BatchTarget {
    /// Run the annotator in this process
    Local(Annotator),
    /// POST to a running server
    Endpoint { client: reqwest::Client, url: String },
}

impl BatchTarget {
    pub fn endpoint(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("topic-annotator/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::Endpoint {
            client,
            url: url.to_string(),
        })
    }

    async fn annotate(&self, raw: String) -> Result<String> {
        match self {
            Self::Local(annotator) => annotator.annotate_json(&raw, true).await,
            Self::Endpoint { client, url } => {
                let response = client
                    .post(url)
                    .query(&[("pretty", "True")])
                    .header(ACCEPT, "application/json")
                    .header(CONTENT_TYPE, "application/json")
                    .body(raw)
                    .send()
                    .await
                    .with_context(|| format!("Request to {url} failed"))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    anyhow::bail!("{url} returned {status}: {body}");
                }
                response
                    .text()
                    .await
                    .context("Failed to read annotated MMIF from response")
            }
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output files written
    pub written: Vec<PathBuf>,
    /// Input files that failed, with the error
    pub failed: Vec<(PathBuf, String)>,
}

/// MMIF inputs in `dir`, sorted by name.
pub fn input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Annotate every input file, writing results into `out_dir`.
pub async fn run(
    target: &BatchTarget,
    in_dir: &Path,
    out_dir: &Path,
    concurrency: usize,
) -> Result<BatchReport> {
    let files = input_files(in_dir)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    info!(files = files.len(), concurrency, "Starting batch annotation");

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Annotating [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let results: Vec<(PathBuf, Result<PathBuf>)> = stream::iter(files.into_iter().map(|input| {
        let pb = pb.clone();
        async move {
            let result = process_file(target, &input, out_dir).await;
            pb.inc(1);
            (input, result)
        }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect()
    .await;
    pb.finish_and_clear();

    let mut report = BatchReport::default();
    for (input, result) in results {
        match result {
            Ok(output) => report.written.push(output),
            Err(e) => {
                warn!(file = %input.display(), error = %format!("{e:#}"), "Failed to annotate file");
                report.failed.push((input, format!("{e:#}")));
            }
        }
    }
    report.written.sort();
    report.failed.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(report)
}

async fn process_file(target: &BatchTarget, input: &Path, out_dir: &Path) -> Result<PathBuf> {
    let name = input
        .file_name()
        .with_context(|| format!("Input path {} has no file name", input.display()))?;
    let raw = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let annotated = target.annotate(raw).await?;

    let output = out_dir.join(name);
    tokio::fs::write(&output, annotated)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(output)
}
