//! Plugin and command line configuration.

use crate::types::{BuildResult, PluginError, PublishError, Result};
use crate::upload::{NewRelicPublisher, DEFAULT_ENDPOINT};
use crate::url_builder::StaticAssetUrlBuilder;
use clap::{Parser, Subcommand};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Receives each failed upload in place of the default warning.
pub type ErrorCallback = Arc<dyn Fn(&PublishError) + Send + Sync>;

/// Options accepted by [`crate::NewRelicPlugin::new`].
///
/// Unset optional fields fall back to their defaults when the plugin is
/// constructed.
#[derive(Clone, Default)]
pub struct PluginConfig {
    pub application_id: Option<String>,
    pub nr_admin_key: Option<String>,
    pub static_asset_url: Option<String>,
    pub release_name: Option<String>,
    pub release_id: Option<String>,
    pub static_asset_url_builder: Option<StaticAssetUrlBuilder>,
    pub extension_regex: Option<Regex>,
    pub error_callback: Option<ErrorCallback>,
    /// Skip hook registration entirely.
    pub noop: bool,
}

impl PluginConfig {
    pub fn new(
        application_id: impl Into<String>,
        nr_admin_key: impl Into<String>,
        static_asset_url: impl Into<String>,
    ) -> Self {
        Self {
            application_id: Some(application_id.into()),
            nr_admin_key: Some(nr_admin_key.into()),
            static_asset_url: Some(static_asset_url.into()),
            ..Self::default()
        }
    }

    pub fn with_release(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.release_name = Some(name.into());
        self.release_id = Some(id.into());
        self
    }

    pub fn with_static_asset_url_builder(mut self, builder: StaticAssetUrlBuilder) -> Self {
        self.static_asset_url_builder = Some(builder);
        self
    }

    pub fn with_extension_regex(mut self, regex: Regex) -> Self {
        self.extension_regex = Some(regex);
        self
    }

    pub fn with_error_callback(mut self, callback: ErrorCallback) -> Self {
        self.error_callback = Some(callback);
        self
    }

    pub fn with_noop(mut self, noop: bool) -> Self {
        self.noop = noop;
        self
    }

    /// Check required fields in order: applicationId, staticAssetUrl, nrAdminKey.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("applicationId", &self.application_id),
            ("staticAssetUrl", &self.static_asset_url),
            ("nrAdminKey", &self.nr_admin_key),
        ];

        for (field, value) in required {
            if value.as_deref().map_or(true, str::is_empty) {
                return Err(PluginError::Config(format!("{} is required", field)));
            }
        }

        Ok(())
    }
}

/// Registers bundle source maps with New Relic browser monitoring.
#[derive(Parser, Debug, Clone)]
#[command(name = "newrelic-sourcemaps")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Upload the source maps listed in a build stats file
    Upload(UploadArgs),
    /// Print the source map reference embedded in each asset's chunks
    Locate(LocateArgs),
}

/// Configuration for the upload command.
#[derive(Parser, Debug, Clone)]
pub struct UploadArgs {
    /// Build stats JSON written by the bundler
    #[arg(short, long)]
    pub stats: PathBuf,

    /// New Relic browser application ID
    #[arg(long, env = "NEW_RELIC_APPLICATION_ID")]
    pub application_id: Option<String>,

    /// New Relic admin API key
    #[arg(long, env = "NEW_RELIC_ADMIN_KEY", hide_env_values = true)]
    pub admin_key: Option<String>,

    /// Root URL the static assets are served from
    #[arg(long, env = "NEW_RELIC_STATIC_ASSET_URL")]
    pub static_asset_url: Option<String>,

    /// Release name attached to every uploaded map
    #[arg(long, env = "NEW_RELIC_RELEASE_NAME")]
    pub release_name: Option<String>,

    /// Release ID attached to every uploaded map
    #[arg(long, env = "NEW_RELIC_RELEASE_ID")]
    pub release_id: Option<String>,

    /// Only assets whose names match this pattern are uploaded
    #[arg(long)]
    pub extension_regex: Option<String>,

    /// Do nothing (useful for local builds)
    #[arg(long)]
    pub noop: bool,

    /// Source map service root
    #[arg(long, env = "NEW_RELIC_SOURCEMAP_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl UploadArgs {
    /// Plugin configuration from command line flags.
    pub fn plugin_config(&self) -> Result<PluginConfig> {
        let extension_regex = self
            .extension_regex
            .as_deref()
            .map(Regex::new)
            .transpose()?;

        Ok(PluginConfig {
            application_id: self.application_id.clone(),
            nr_admin_key: self.admin_key.clone(),
            static_asset_url: self.static_asset_url.clone(),
            release_name: self.release_name.clone(),
            release_id: self.release_id.clone(),
            static_asset_url_builder: None,
            extension_regex,
            error_callback: None,
            noop: self.noop,
        })
    }

    /// HTTP publisher for the configured endpoint and timeout.
    pub fn publisher(&self) -> Result<NewRelicPublisher> {
        Ok(NewRelicPublisher::new(self.timeout)?.with_endpoint(&self.endpoint)?)
    }
}

/// Configuration for the locate command.
#[derive(Parser, Debug, Clone)]
pub struct LocateArgs {
    /// Build stats JSON written by the bundler
    #[arg(short, long)]
    pub stats: PathBuf,
}

/// Read a build result from a stats JSON file.
pub fn load_build_result(path: &Path) -> Result<BuildResult> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
