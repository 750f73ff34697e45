//! Build hook that uploads source maps once a build pass completes.

use crate::config::{ErrorCallback, PluginConfig};
use crate::notify::UploadLogger;
use crate::types::{BuildResult, PublishError, Result, UploadOutcome};
use crate::upload::{upload_source_map, SourcemapPublisher, UploadOptions};
use crate::url_builder::{default_builder, StaticAssetUrlBuilder};
use futures::future::{join_all, BoxFuture};
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// Event a build tool fires after every completed build pass.
pub const DONE_EVENT: &str = "done";

/// Default asset filter: names ending in `.js`.
pub const DEFAULT_EXTENSION_PATTERN: &str = r"\.js$";

/// Completion hook handed to the build tool. Resolves once every upload it
/// started has settled.
pub type DoneCallback =
    Box<dyn Fn(Arc<BuildResult>) -> BoxFuture<'static, Vec<UploadOutcome>> + Send + Sync>;

/// A build tool that accepts lifecycle hooks.
pub trait Compiler {
    fn plugin(&mut self, event: &str, callback: DoneCallback);
}

/// Uploads a build's source maps to New Relic.
#[derive(Clone)]
pub struct NewRelicPlugin {
    application_id: String,
    nr_admin_key: String,
    static_asset_url: String,
    release_name: String,
    release_id: String,
    static_asset_url_builder: StaticAssetUrlBuilder,
    extension_regex: Regex,
    error_callback: ErrorCallback,
    noop: bool,
    publisher: Arc<dyn SourcemapPublisher>,
    logger: Arc<dyn UploadLogger>,
}

impl NewRelicPlugin {
    /// Validate `config` and resolve its defaults.
    ///
    /// Fails on the first missing required field unless `config.noop` is set.
    pub fn new(
        config: PluginConfig,
        publisher: Arc<dyn SourcemapPublisher>,
        logger: Arc<dyn UploadLogger>,
    ) -> Result<Self> {
        if !config.noop {
            config.validate()?;
        }

        let extension_regex = match config.extension_regex {
            Some(regex) => regex,
            None => Regex::new(DEFAULT_EXTENSION_PATTERN)?,
        };

        let error_callback = config.error_callback.unwrap_or_else(|| {
            let logger = Arc::clone(&logger);
            Arc::new(move |err: &PublishError| {
                logger.warn(&format!("New Relic sourcemap upload error: {}", err))
            })
        });

        Ok(Self {
            application_id: config.application_id.unwrap_or_default(),
            nr_admin_key: config.nr_admin_key.unwrap_or_default(),
            static_asset_url: config.static_asset_url.unwrap_or_default(),
            release_name: config.release_name.unwrap_or_default(),
            release_id: config.release_id.unwrap_or_default(),
            static_asset_url_builder: config
                .static_asset_url_builder
                .unwrap_or_else(default_builder),
            extension_regex,
            error_callback,
            noop: config.noop,
            publisher,
            logger,
        })
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn static_asset_url(&self) -> &str {
        &self.static_asset_url
    }

    pub fn static_asset_url_builder(&self) -> &StaticAssetUrlBuilder {
        &self.static_asset_url_builder
    }

    pub fn extension_regex(&self) -> &Regex {
        &self.extension_regex
    }

    pub fn error_callback(&self) -> &ErrorCallback {
        &self.error_callback
    }

    pub fn is_noop(&self) -> bool {
        self.noop
    }

    /// Hook into the compiler's done event. In noop mode the compiler is left
    /// untouched.
    pub fn apply(&self, compiler: &mut dyn Compiler) {
        if self.noop {
            debug!("noop mode, not registering the {} hook", DONE_EVENT);
            return;
        }

        let plugin = self.clone();
        compiler.plugin(
            DONE_EVENT,
            Box::new(
                move |stats: Arc<BuildResult>| -> BoxFuture<'static, Vec<UploadOutcome>> {
                    let plugin = plugin.clone();
                    Box::pin(async move { plugin.on_build_complete(&stats).await })
                },
            ),
        );
    }

    /// Upload every matching asset of a finished build.
    ///
    /// Uploads run concurrently and the result is returned only after all of
    /// them settle; failures go to the error callback and never stop the rest.
    pub async fn on_build_complete(&self, stats: &BuildResult) -> Vec<UploadOutcome> {
        let compilation = &stats.compilation;
        let opts = UploadOptions {
            assets: &compilation.assets,
            static_asset_url_builder: &self.static_asset_url_builder,
            public_path: &compilation.output_options.public_path,
            application_id: &self.application_id,
            nr_admin_key: &self.nr_admin_key,
            url: &self.static_asset_url,
            release_name: &self.release_name,
            release_id: &self.release_id,
            stats,
            publisher: self.publisher.as_ref(),
            logger: self.logger.as_ref(),
        };

        let matching: Vec<&String> = compilation
            .assets
            .keys()
            .filter(|name| self.extension_regex.is_match(name))
            .collect();

        debug!(
            "{} of {} assets match {}",
            matching.len(),
            compilation.assets.len(),
            self.extension_regex
        );

        let opts = &opts;
        let uploads = matching.into_iter().map(|name| async move {
            let outcome = upload_source_map(opts, name).await;
            self.report(&outcome);
            outcome
        });

        join_all(uploads).await
    }

    fn report(&self, outcome: &UploadOutcome) {
        match outcome {
            UploadOutcome::Uploaded { url, .. } => {
                self.logger
                    .info(&format!("sourceMap for {} uploaded to newrelic", url));
            }
            UploadOutcome::Failed { error, .. } => (self.error_callback)(error),
            UploadOutcome::Skipped { .. } => {}
        }
    }
}
