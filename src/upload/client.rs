//! Registration clients that publish a source map for a served bundle.

use crate::types::PublishError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Default New Relic source map service.
pub const DEFAULT_ENDPOINT: &str = "https://sourcemaps.service.newrelic.com";

/// Everything a registration client needs for one source map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Local absolute path of the map file.
    pub sourcemap_path: PathBuf,
    /// Public URL the matching bundle is served from.
    pub javascript_url: String,
    pub application_id: String,
    pub nr_admin_key: String,
    pub release_name: String,
    pub release_id: String,
}

/// Associates a source map with a public bundle URL on a remote service.
#[async_trait]
pub trait SourcemapPublisher: Send + Sync {
    async fn publish(&self, request: &PublishRequest) -> Result<(), PublishError>;
}

/// Publishes source maps to the New Relic browser source map API.
pub struct NewRelicPublisher {
    client: Client,
    endpoint: Url,
}

impl NewRelicPublisher {
    /// Create a publisher for the default endpoint.
    pub fn new(timeout_secs: u64) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("newrelic-sourcemaps/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: Url::parse(DEFAULT_ENDPOINT)?,
        })
    }

    /// Point the publisher at another service root (EU region, proxy).
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, PublishError> {
        let mut endpoint = Url::parse(endpoint)?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        self.endpoint = endpoint;
        Ok(self)
    }

    /// Upload URL for an application's source maps.
    fn sourcemaps_url(&self, application_id: &str) -> Result<Url, PublishError> {
        let path = format!(
            "v2/applications/{}/sourcemaps",
            urlencoding::encode(application_id)
        );
        Ok(self.endpoint.join(&path)?)
    }

    /// Build the multipart body after checking the map parses.
    async fn build_form(&self, request: &PublishRequest) -> Result<Form, PublishError> {
        let bytes = tokio::fs::read(&request.sourcemap_path).await?;
        sourcemap::SourceMap::from_slice(&bytes)
            .map_err(|e| PublishError::InvalidSourceMap(e.to_string()))?;

        let file_name = request
            .sourcemap_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sourcemap.js.map".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/json")?;

        let form = form_fields(request)
            .into_iter()
            .fold(Form::new().part("sourcemap", part), |form, (name, value)| {
                form.text(name, value)
            });

        Ok(form)
    }
}

/// Text fields sent next to the map file. Empty release fields are omitted.
fn form_fields(request: &PublishRequest) -> Vec<(&'static str, String)> {
    let mut fields = vec![("javascriptUrl", request.javascript_url.clone())];

    if !request.release_name.is_empty() {
        fields.push(("releaseName", request.release_name.clone()));
    }
    if !request.release_id.is_empty() {
        fields.push(("releaseId", request.release_id.clone()));
    }

    fields
}

#[async_trait]
impl SourcemapPublisher for NewRelicPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<(), PublishError> {
        let form = self.build_form(request).await?;
        let url = self.sourcemaps_url(&request.application_id)?;
        trace!("Publishing {} to {}", request.sourcemap_path.display(), url);

        let response = self
            .client
            .post(url)
            .header("NewRelic-Api-Key", &request.nr_admin_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Source map accepted for {}", request.javascript_url);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
