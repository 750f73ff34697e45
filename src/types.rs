//! Core types and errors for source map registration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while setting up or driving the plugin.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid extension pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Publisher setup failed: {0}")]
    Publish(#[from] PublishError),
}

pub type Result<T> = std::result::Result<T, PluginError>;

/// Failure reported by a registration client for a single source map.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not read source map: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid source map: {0}")]
    InvalidSourceMap(String),

    #[error("rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("{0}")]
    Other(String),
}

/// Summary of one build pass as handed to the completion hook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    #[serde(default)]
    pub compilation: Compilation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compilation {
    /// Output file name to asset descriptor.
    #[serde(default)]
    pub assets: BTreeMap<String, BuildAsset>,
    #[serde(default)]
    pub output_options: OutputOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    #[serde(default)]
    pub public_path: String,
}

/// One named output file of a build pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildAsset {
    /// Whether the file was physically written during this pass.
    #[serde(default)]
    pub emitted: bool,
    /// Absolute path of the written file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists_at: Option<PathBuf>,
    /// Source chunks the bundler concatenated into this asset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Chunk>,
}

impl BuildAsset {
    /// An asset that was written to `path`.
    pub fn emitted(path: impl Into<PathBuf>) -> Self {
        Self {
            emitted: true,
            exists_at: Some(path.into()),
            children: Vec::new(),
        }
    }

    /// Location on disk, if the asset is eligible for upload.
    pub fn emitted_path(&self) -> Option<&Path> {
        if !self.emitted {
            return None;
        }
        self.exists_at.as_deref()
    }
}

/// A bundle chunk, either raw text or a wrapper object holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Chunk {
    Raw(String),
    Wrapped {
        #[serde(alias = "_value")]
        value: String,
    },
}

impl Chunk {
    pub fn payload(&self) -> &str {
        match self {
            Chunk::Raw(text) => text,
            Chunk::Wrapped { value } => value,
        }
    }
}

/// Result of dispatching one asset to the registration client.
#[derive(Debug)]
pub enum UploadOutcome {
    /// The map was registered for `url`.
    Uploaded { asset: String, url: String },
    /// No emitted map was found under `asset`; nothing was sent.
    Skipped { asset: String },
    /// The registration client failed.
    Failed { asset: String, error: PublishError },
}

impl UploadOutcome {
    pub fn asset(&self) -> &str {
        match self {
            UploadOutcome::Uploaded { asset, .. }
            | UploadOutcome::Skipped { asset }
            | UploadOutcome::Failed { asset, .. } => asset,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded { .. })
    }
}
