// App metadata — the self-description served at GET / and printed by the CLI.

use serde::Serialize;
use serde_json::{json, Value};

use super::vocabulary::{text_document_uri, MMIF_VERSION, TOPIC};

/// Identifier written into the `app` field of every view this app signs.
pub const APP_IDENTIFIER: &str = "https://apps.clams.ai/topic-modeling";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppMetadata {
    pub identifier: String,
    pub url: String,
    pub name: String,
    pub description: String,
    pub app_version: String,
    pub app_license: String,
    pub analyzer_version: String,
    pub analyzer_license: String,
    pub mmif_version: String,
    pub input: Vec<Value>,
    pub output: Vec<Value>,
}

impl AppMetadata {
    pub fn topic_modeling() -> Self {
        Self {
            identifier: APP_IDENTIFIER.to_string(),
            url: "https://github.com/clamsproject/app-topic-modeling".to_string(),
            name: "NMF Topic Modeling".to_string(),
            description: "Apply NMF topic modeling to all text documents in a MMIF file."
                .to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            app_license: "Apache 2.0".to_string(),
            analyzer_version: "nmf-1".to_string(),
            analyzer_license: "BSD-3C".to_string(),
            mmif_version: MMIF_VERSION.to_string(),
            input: vec![json!({ "@type": text_document_uri(), "required": true })],
            output: vec![json!({ "@type": TOPIC })],
        }
    }

    pub fn to_json(&self, pretty: bool) -> String {
        let out = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        // Plain strings and JSON values only, serialization can't fail.
        out.unwrap_or_default()
    }
}
