//! HTTP embedding service client.
//!
//! Talks to a remotely served sentence-embedding model. Three request
//! dialects are supported; responses in any of the three shapes are accepted.

use crate::device::Device;
use crate::provider::{EmbeddingProvider, ProviderInfo};
use fieldmatch_core::{Error, Result, Vector};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Request body dialect of the embedding endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFormat {
    /// `{"input": [...], "model": ...}` → `{"data": [{"embedding": [...]}]}`
    #[default]
    OpenAi,
    /// `{"inputs": [...]}` → `[[...], ...]`
    HuggingFace,
    /// `{"texts": [...], "model": ...}` → `{"embeddings": [[...], ...]}`
    Custom,
}

impl fmt::Display for ApiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenAi => "openai",
            Self::HuggingFace => "huggingface",
            Self::Custom => "custom",
        })
    }
}

impl FromStr for ApiFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "hf" | "huggingface" => Ok(Self::HuggingFace),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown api format '{other}' (expected openai, huggingface or custom)")),
        }
    }
}

pub struct HttpEmbedder {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    format: ApiFormat,
    auth_header: Option<String>,
    device: Device,
}

impl HttpEmbedder {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            format: ApiFormat::default(),
            auth_header: None,
            device: Device::default(),
        })
    }

    pub fn with_format(mut self, format: ApiFormat) -> Self {
        self.format = format;
        self
    }

    /// Value sent verbatim as the `Authorization` header
    pub fn with_auth_header(mut self, header: impl Into<String>) -> Self {
        self.auth_header = Some(header.into());
        self
    }

    /// The model runs server-side; the device is recorded for diagnostics only.
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    fn send(&self, payload: &Value) -> Result<Value> {
        let mut request = self.client.post(&self.endpoint).json(payload);
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request
            .send()
            .map_err(|e| Error::EmbeddingFailure(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::EmbeddingFailure(format!("HTTP error {status}: {body}")));
        }

        response
            .json::<Value>()
            .map_err(|e| Error::EmbeddingFailure(format!("invalid JSON response: {e}")))
    }
}

impl EmbeddingProvider for HttpEmbedder {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "http".to_string(),
            model: self.model.clone(),
            dimension: None,
            device: self.device,
        }
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        info!(endpoint = %self.endpoint, model = %self.model, texts = texts.len(), "requesting embeddings");
        let payload = build_payload(self.format, texts, &self.model);
        let response = self.send(&payload)?;
        let vectors = parse_embeddings(response)?;
        debug!(vectors = vectors.len(), "embedding response parsed");

        if vectors.len() != texts.len() {
            return Err(Error::EmbeddingFailure(format!(
                "API returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }

        Ok(vectors.into_iter().map(Vector::new).collect())
    }
}

fn build_payload(format: ApiFormat, texts: &[String], model: &str) -> Value {
    match format {
        ApiFormat::OpenAi => json!({ "input": texts, "model": model }),
        ApiFormat::HuggingFace => json!({ "inputs": texts }),
        ApiFormat::Custom => json!({ "texts": texts, "model": model }),
    }
}

fn parse_embeddings(value: Value) -> Result<Vec<Vec<f32>>> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_embedding_collection(embeddings);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                let mut indexed = Vec::with_capacity(items.len());
                for (position, item) in items.into_iter().enumerate() {
                    let Value::Object(mut obj) = item else {
                        return Err(Error::EmbeddingFailure("unexpected entry inside `data` array".into()));
                    };
                    let embedding = obj
                        .remove("embedding")
                        .ok_or_else(|| Error::EmbeddingFailure("missing `embedding` field in data item".into()))?;
                    let index = obj
                        .get("index")
                        .and_then(Value::as_u64)
                        .map_or(position, |i| i as usize);
                    indexed.push((index, parse_embedding_vector(embedding)?));
                }
                indexed.sort_by_key(|(index, _)| *index);
                return Ok(indexed.into_iter().map(|(_, v)| v).collect());
            }

            Err(Error::EmbeddingFailure("unsupported API response shape".into()))
        }
        other => parse_embedding_collection(other),
    }
}

fn parse_embedding_collection(value: Value) -> Result<Vec<Vec<f32>>> {
    match value {
        Value::Array(items) if items.iter().all(|item| matches!(item, Value::Array(_))) => {
            items.into_iter().map(parse_embedding_vector).collect()
        }
        other => Err(Error::EmbeddingFailure(format!(
            "expected an array of embedding vectors, got {other}"
        ))),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f32>> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num
                    .as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| Error::EmbeddingFailure("non-finite embedding value".into())),
                other => Err(Error::EmbeddingFailure(format!(
                    "embedding entries must be numbers, got {other}"
                ))),
            })
            .collect(),
        other => Err(Error::EmbeddingFailure(format!(
            "embedding vector must be an array, got {other}"
        ))),
    }
}
