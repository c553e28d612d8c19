// MMIF container types — the subset this app reads and writes.
//
// A MMIF file is { metadata, documents, views }. Documents and annotations
// share one shape ({ "@type", "properties" }), so both are `Annotation`.
// Every struct keeps unrecognized keys in a flattened `extra` map and
// properties stay a raw JSON map, so a container round-trips through
// annotate() without losing fields other apps wrote.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::vocabulary::is_text_document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mmif {
    pub metadata: MmifMetadata,
    #[serde(default)]
    pub documents: Vec<Annotation>,
    #[serde(default)]
    pub views: Vec<View>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MmifMetadata {
    /// MMIF version URI, e.g. http://mmif.clams.ai/0.4.0
    #[serde(default)]
    pub mmif: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A document or an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "@type")]
    pub at_type: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub id: String,
    #[serde(default)]
    pub metadata: ViewMetadata,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewMetadata {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub app: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Annotation type URI → type-level properties (e.g. the source document)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub contains: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Mmif {
    /// Parse a MMIF JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Input is not a valid MMIF document")
    }

    /// Serialize, optionally pretty-printed.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let out = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        out.context("Failed to serialize MMIF")
    }

    /// Top-level text documents.
    pub fn text_documents(&self) -> impl Iterator<Item = &Annotation> {
        self.documents
            .iter()
            .filter(|doc| is_text_document(&doc.at_type))
    }

    /// Text documents created inside a view (e.g. transcripts from an ASR app).
    pub fn documents_in_view(&self, view_id: &str) -> Vec<&Annotation> {
        self.views
            .iter()
            .filter(|view| view.id == view_id)
            .flat_map(|view| view.annotations.iter())
            .filter(|ann| is_text_document(&ann.at_type))
            .collect()
    }

    /// First unused id of the form `v_N`, starting at the current view count.
    pub fn new_view_id(&self) -> String {
        let mut n = self.views.len();
        loop {
            let candidate = format!("v_{n}");
            if !self.views.iter().any(|v| v.id == candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Append a new, empty view signed by `app` and return it.
    pub fn new_view(&mut self, app: &str) -> &mut View {
        let view = View {
            id: self.new_view_id(),
            metadata: ViewMetadata {
                app: app.to_string(),
                timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)),
                ..ViewMetadata::default()
            },
            annotations: Vec::new(),
            extra: Map::new(),
        };
        self.views.push(view);
        let last = self.views.len() - 1;
        &mut self.views[last]
    }
}

impl View {
    /// Declare that this view contains annotations of `at_type`, optionally
    /// all anchored to one document.
    pub fn new_contain(&mut self, at_type: &str, document: Option<&str>) {
        let mut props = Map::new();
        if let Some(doc) = document {
            props.insert("document".to_string(), Value::from(doc));
        }
        self.metadata
            .contains
            .insert(at_type.to_string(), Value::Object(props));
    }

    /// Append a new annotation with the given id and return it.
    pub fn new_annotation(&mut self, at_type: &str, id: String) -> &mut Annotation {
        let mut properties = Map::new();
        properties.insert("id".to_string(), Value::String(id));
        self.annotations.push(Annotation {
            at_type: at_type.to_string(),
            properties,
            extra: Map::new(),
        });
        let last = self.annotations.len() - 1;
        &mut self.annotations[last]
    }
}

impl Annotation {
    pub fn id(&self) -> &str {
        self.property_str("id").unwrap_or_default()
    }

    /// Location URI of an external text file, if any.
    pub fn location(&self) -> Option<&str> {
        self.property_str("location").filter(|l| !l.is_empty())
    }

    /// Inline text (`properties.text.@value`), if any.
    pub fn text_value(&self) -> Option<&str> {
        self.properties
            .get("text")
            .and_then(|t| t.get("@value"))
            .and_then(Value::as_str)
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    pub fn add_property(&mut self, key: &str, value: impl Into<Value>) {
        self.properties.insert(key.to_string(), value.into());
    }
}
