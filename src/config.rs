use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::model::artifacts::{default_model_dir, missing_model_files};

/// Default number of topics emitted per document.
pub const DEFAULT_NUM_TOPIC_DISPLAY: usize = 5;
/// Topic index whose top terms don't form a usable theme in the shipped model.
pub const DEFAULT_SKIPPED_TOPIC: usize = 25;
/// Number of feature names used to build each topic label.
pub const DEFAULT_NUM_TOP_WORDS: usize = 10;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy, so everything here can
/// also live in a local `.env` next to the binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing the pretrained model artifacts
    pub model_dir: PathBuf,
    /// How many topics to emit per document (`num_topic_display`)
    pub num_topic_display: usize,
    /// Topic excluded from output, if any
    pub skipped_topic: Option<usize>,
    /// How many top terms make up a topic label
    pub num_top_words: usize,
    /// Address the server binds to
    pub bind: String,
    /// Port the server listens on
    pub port: u16,
    /// Timeout for fetching document text from a location
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            num_topic_display: DEFAULT_NUM_TOPIC_DISPLAY,
            skipped_topic: Some(DEFAULT_SKIPPED_TOPIC),
            num_top_words: DEFAULT_NUM_TOP_WORDS,
            bind: "0.0.0.0".to_string(),
            port: 5000,
            fetch_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a default; a variable that is set but doesn't parse
    /// is an error rather than a silent fallback.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let model_dir = env::var("TOPICS_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_dir);

        let skipped_topic = match env::var("TOPICS_SKIP_ID") {
            Ok(raw) => parse_skipped_topic(&raw)?,
            Err(_) => defaults.skipped_topic,
        };

        Ok(Self {
            model_dir,
            num_topic_display: env_or("TOPICS_DISPLAY", defaults.num_topic_display)?,
            skipped_topic,
            num_top_words: env_or("TOPICS_TOP_WORDS", defaults.num_top_words)?,
            bind: env::var("TOPICS_BIND").unwrap_or(defaults.bind),
            port: env_or("TOPICS_PORT", defaults.port)?,
            fetch_timeout_secs: env_or("TOPICS_FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)?,
        })
    }

    /// Check that every model artifact is present in `model_dir`.
    /// Call this before loading the model so the failure names the missing files.
    pub fn require_models(&self) -> Result<()> {
        let missing = missing_model_files(&self.model_dir);
        if !missing.is_empty() {
            anyhow::bail!(
                "Model files not found in {}: {}\n\
                 Set TOPICS_MODEL_DIR to the directory holding the exported model artifacts.",
                self.model_dir.display(),
                missing.join(", ")
            );
        }
        Ok(())
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

/// `none` (or an empty value) disables skipping entirely.
pub fn parse_skipped_topic(raw: &str) -> Result<Option<usize>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let id = raw
        .parse()
        .with_context(|| format!("TOPICS_SKIP_ID must be a topic index or `none`, got {raw:?}"))?;
    Ok(Some(id))
}
